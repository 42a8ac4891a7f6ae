pub mod chat;
mod http;
