//! Basic usage examples for Bindery query construction

use bindery_core::{delete, insert, select, update, values, QueryBuilder};

fn main() -> bindery_core::Result<()> {
    // INSERT with every key participating
    let query = insert("users")
        .values(values! { "name" => "John", "email" => "john@example.com", "age" => 30 })
        .to_query()?;
    println!("Insert: {}", query.text);
    println!("  binds: {:?}", query.values);

    // INSERT excluding a caller-managed key
    let query = insert("users")
        .values(values! { "id" => 1, "name" => "Jane" })
        .excluding(&["id"])
        .to_query()?;
    println!("Insert (excluding id): {}", query.text);

    // UPDATE with a column used both as SET target and WHERE key;
    // the WHERE bind is renamed with the collision marker
    let query = update("users")
        .set(values! { "status" => "archived" })
        .where_(values! { "id" => 7, "status" => "active" })
        .to_query()?;
    println!("Update: {}", query.text);
    println!("  binds: {:?}", query.values);

    // DELETE requires a WHERE condition and can cap affected rows
    let query = delete("sessions")
        .where_(values! { "user_id" => 7 })
        .limit(10)
        .to_query()?;
    println!("Delete: {}", query.text);

    // a delete with an empty WHERE never builds
    let err = delete("sessions").to_query().unwrap_err();
    println!("Refused: {err}");

    // SELECT with dotted fields and a raw WHERE fragment
    let query = select("orders")
        .fields("orders.id, orders.total")
        .where_("total >= 100")
        .to_query()?;
    println!("Select: {}", query.text);

    // rewrite to positional placeholders for drivers without named binds
    let query = select("users")
        .fields("id, name")
        .where_(values! { "status" => "active" })
        .to_query()?;
    let (sql, params) = query.to_positional()?;
    println!("Positional: {sql} with {params:?}");

    Ok(())
}
