//! Prints the SQL and arguments produced by a few builder chains.
//!
//! Run with: `cargo run -p pgfluent --example builder`

use pgfluent::{Assign, Builder, raw};

fn show(label: &str, b: &Builder<'_>) {
    println!("{label}:\n  {}\n  args = {:?}\n", b.to_sql(), b.args());
}

fn main() {
    let mut b = Builder::new();
    b.select(["*"])
        .from("users")
        .where_("age > ?", [18])
        .and_where("status = ?", ["active"])
        .order_by(["created_at DESC"])
        .limit(20);
    show("select", &b);

    let mut b = Builder::new();
    b.insert("users", ["name", "email"])
        .values(["zed", "zed@example.com"])
        .returning(["id"]);
    show("insert", &b);

    let mut b = Builder::new();
    b.update("users")
        .set([
            ("name", Assign::value("New Name")),
            ("visits", Assign::expr(raw("visits + 1"))),
        ])
        .where_("id = ?", [1_i64]);
    show("update", &b);

    let mut b = Builder::new();
    b.delete("users")
        .where_("status = ?", ["inactive"])
        .and_where("last_login < ?", ["2024-12-23"]);
    show("delete", &b);
}
