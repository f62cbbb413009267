//! Lens - a browser front-end for photo classification and travel chat.
//!
//! The pure state machines (`capture`, `selection`, `submit`, `chat`) carry
//! every rule the page follows; `ui` and `views` only bind them to Dioxus
//! components and `web` holds the browser-specific glue.

pub mod api;
pub mod capture;
pub mod chat;
pub mod config;
pub mod error;
pub mod render;
pub mod selection;
pub mod submit;
pub mod types;
pub mod web;
pub mod workflow;

#[cfg(feature = "dioxus")]
pub mod ui;
#[cfg(feature = "dioxus")]
pub mod views;
