//! Lane posting pair engine.
//!
//! A web service that answers: "I have one truckload lane, how do I
//! post it several times without the load board flagging duplicates?"
//! It finds nearby pickup/delivery cities spread across distinct
//! market areas and expands them into board-ready posting rows.

pub mod catalog;
pub mod discovery;
pub mod domain;
pub mod export;
pub mod geo;
pub mod pairing;
pub mod web;
