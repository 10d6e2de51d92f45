//! # Rendering
//!
//! Plain-text views of store state. Every function returns a `String` so the
//! loop decides where it goes.

use std::fmt::Write;

use cyber_core::{Cart, CatalogItem, Favorites, Transaction};
use cyber_session::{ActionResult, SessionStore};

pub const HELP: &str = "\
COMMANDS
  signup <user> <pass>    create an identity
  login <user> <pass>     jack in
  logout                  jack out
  items                   list the catalog (current filters)
  search <text>           filter by name; no text clears
  sort <key>              price-asc | price-desc | name | none
  category <name>         all | weapon | implant | gear
  add <id>                add an item to the loadout
  remove <n>              remove loadout entry n
  cart                    show the loadout
  clear                   empty the loadout
  checkout                buy the loadout
  fav <id>                toggle a favorite
  history                 past transactions
  whoami                  identity and balance
  help                    this list
  quit                    exit";

pub fn action(result: &ActionResult) -> String {
    if result.success {
        format!(">> {}", result.message)
    } else {
        format!("!! {}", result.message)
    }
}

pub fn items(items: &[&CatalogItem], favorites: &Favorites) -> String {
    if items.is_empty() {
        return "NO MATCHING ITEMS.".to_string();
    }

    let mut out = String::new();
    for item in items {
        let star = if favorites.contains(item.id) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{star}[{:>2}] {:<22} {:<8} {:>10}",
            item.id,
            item.name,
            item.category.as_str(),
            item.price.to_string()
        );

        if !item.stats.is_empty() {
            let stats: Vec<String> = item
                .stats
                .iter()
                .map(|(label, value)| format!("{}: {}", label, value))
                .collect();
            let _ = writeln!(out, "      {}", stats.join(" | "));
        }
    }
    out.trim_end().to_string()
}

pub fn cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "LOADOUT EMPTY.".to_string();
    }

    let mut out = String::new();
    for (position, item) in cart.items().iter().enumerate() {
        let _ = writeln!(
            out,
            " {:>2}. {:<22} {:>10}",
            position + 1,
            item.name,
            item.price.to_string()
        );
    }
    let _ = write!(out, " TOTAL {:>32}", cart.total().to_string());
    out
}

pub fn history(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "NO TRANSACTIONS ON RECORD.".to_string();
    }

    let mut out = String::new();
    for transaction in transactions {
        let names: Vec<&str> = transaction.items.iter().map(|i| i.name.as_str()).collect();
        let _ = writeln!(
            out,
            "#{} {} {:>10}  {}",
            transaction.id,
            transaction.timestamp.format("%Y-%m-%d %H:%M:%S"),
            transaction.total.to_string(),
            names.join(", ")
        );
    }
    out.trim_end().to_string()
}

pub fn whoami(store: &SessionStore) -> String {
    match store.user() {
        Some(user) => format!("NETRUNNER {} | BALANCE {}", user.username, user.credits),
        None => format!("GUEST (NOT JACKED IN) | BALANCE {}", store.credits()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyber_core::{Catalog, Credits};

    #[test]
    fn test_action_prefix() {
        assert_eq!(action(&ActionResult::ok("DONE")), ">> DONE");
        assert_eq!(action(&ActionResult::failure("NOPE")), "!! NOPE");
    }

    #[test]
    fn test_items_marks_favorites() {
        let catalog = Catalog::builtin();
        let mut favorites = Favorites::new();
        favorites.toggle(7);

        let visible: Vec<&CatalogItem> = catalog
            .items()
            .iter()
            .filter(|i| i.id == 7 || i.id == 8)
            .collect();
        let text = items(&visible, &favorites);

        let lines: Vec<&str> = text.lines().filter(|l| l.contains('[')).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("*[ 7]"));
        assert!(lines[1].starts_with(" [ 8]"));
        assert!(text.contains("UNITY"));
    }

    #[test]
    fn test_empty_views() {
        assert_eq!(items(&[], &Favorites::new()), "NO MATCHING ITEMS.");
        assert_eq!(cart(&Cart::new()), "LOADOUT EMPTY.");
        assert_eq!(history(&[]), "NO TRANSACTIONS ON RECORD.");
    }

    #[test]
    fn test_cart_lists_positions_and_total() {
        let catalog = Catalog::builtin();
        let mut loadout = Cart::new();
        loadout.push(catalog.get(7).unwrap().clone());
        loadout.push(catalog.get(8).unwrap().clone());

        let text = cart(&loadout);
        assert!(text.contains(" 1. UNITY"));
        assert!(text.contains(" 2. MAXDOC MK.3"));
        assert!(text.contains(&Credits::from_units(5_000).to_string()));
    }
}
