//! # Command Dispatch
//!
//! Applies a parsed [`Command`] to the store and renders the outcome.

use tracing::debug;

use crate::command::Command;
use crate::render;
use cyber_session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

pub async fn execute(store: &mut SessionStore, command: Command) -> Outcome {
    debug!(?command, "Dispatching command");

    let text = match command {
        Command::Signup(credentials) => render::action(&store.signup(&credentials).await),
        Command::Login(credentials) => render::action(&store.login(&credentials).await),
        Command::Logout => {
            store.logout().await;
            "CONNECTION TERMINATED.".to_string()
        }
        Command::Items => render::items(&store.filtered_items(), store.favorites()),
        Command::Search(text) => {
            store.set_search_query(text);
            render::items(&store.filtered_items(), store.favorites())
        }
        Command::Sort(key) => {
            store.set_sort_by(key);
            render::items(&store.filtered_items(), store.favorites())
        }
        Command::Category(filter) => {
            store.set_selected_category(filter);
            render::items(&store.filtered_items(), store.favorites())
        }
        Command::Add(id) => {
            if store.add_to_cart_by_id(id) {
                format!("ADDED TO LOADOUT. TOTAL {}", store.cart_total())
            } else {
                format!("!! NO ITEM WITH ID {}.", id)
            }
        }
        Command::Remove(index) => {
            if store.remove_from_cart(index) {
                format!("REMOVED. TOTAL {}", store.cart_total())
            } else {
                format!("!! NO LOADOUT ENTRY {}.", index + 1)
            }
        }
        Command::Cart => render::cart(store.cart()),
        Command::Clear => {
            store.clear_cart();
            "LOADOUT CLEARED.".to_string()
        }
        Command::Checkout => {
            let result = store.checkout();
            format!(
                "{}\nBALANCE {}",
                render::action(&result),
                store.credits()
            )
        }
        Command::Fav(id) => {
            if !store.catalog().contains(id) {
                format!("!! NO ITEM WITH ID {}.", id)
            } else if store.toggle_favorite(id) {
                format!("ITEM {} MARKED.", id)
            } else {
                format!("ITEM {} UNMARKED.", id)
            }
        }
        Command::History => render::history(store.transactions()),
        Command::Whoami => render::whoami(store),
        Command::Help => render::HELP.to_string(),
        Command::Quit => return Outcome::Quit,
    };

    Outcome::Print(text)
}
