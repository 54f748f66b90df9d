//! levelgate - resolve which levels of a path the stored session may open
//!
//! This crate is the *composition root*. It wires the reqwest adapter, file
//! storage and system clock into the application services and prints the
//! result as JSON.

mod command;
mod run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run::run().await
}
