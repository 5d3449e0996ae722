//! Walks the contact database end to end: open, create the table, insert,
//! query, update, delete, show what a malformed statement reports, close.
//!
//! Takes the database path as the first argument (defaults to
//! `contacts.db`). The file is recreated on every run.

use std::env;
use std::fs;

use anyhow::Result;
use contact_store::{Contact, ContactStore, SqlQuery};

fn print_contacts(contacts: &ContactStore) -> Result<()> {
    let all = contacts.all()?;
    if all.is_empty() {
        println!("no contacts");
        return Ok(());
    }
    for contact in all {
        println!("{} | {}", contact.id, contact.name);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let db_path = env::args().nth(1).unwrap_or_else(|| "contacts.db".into());
    // fresh database on every run
    let _ = fs::remove_file(&db_path);

    let mut contacts = ContactStore::open(&db_path)?;
    println!("opened contact database at {db_path}");

    contacts.insert(&Contact::new(1, "Ray"))?;
    contacts.insert_many(&[
        Contact::new(2, "Chris"),
        Contact::new(3, "Martha"),
        Contact::new(4, "Danielle"),
    ])?;
    println!("after insert ({} contacts):", contacts.count()?);
    print_contacts(&contacts)?;

    contacts.rename(1, "Chris")?;
    println!("after update:");
    print_contacts(&contacts)?;

    contacts.remove(1)?;
    println!("after delete:");
    print_contacts(&contacts)?;

    // a statement that cannot be prepared surfaces the engine's message
    match contacts
        .store()
        .query(&SqlQuery::new("SELECT Stuff FROM Things WHERE Whatever"))
    {
        Ok(_) => println!("this should not have happened"),
        Err(e) => println!("query could not be prepared: {e}"),
    }

    contacts.close()?;
    println!("connection closed");
    Ok(())
}
