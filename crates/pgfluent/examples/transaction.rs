//! Binds a struct and writes it inside a transaction.
//!
//! Run with: `DATABASE_URL=postgres://... cargo run -p pgfluent --example transaction`

use pgfluent::{Bindable, Builder, FluentError, FluentResult, RawQuery, raw};

#[derive(Bindable)]
struct Product {
    #[db(column = "sku")]
    sku: String,
    #[db(column = "price_cents")]
    price_cents: i64,
    // Kept in memory only.
    cart_count: u32,
}

#[tokio::main]
async fn main() -> FluentResult<()> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| FluentError::Connection("DATABASE_URL is not set".into()))?;

    let (mut client, connection) = tokio_postgres::connect(&url, tokio_postgres::NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });

    RawQuery::new(
        "CREATE TEMP TABLE product (id BIGSERIAL PRIMARY KEY, sku TEXT, price_cents BIGINT)",
        pgfluent::params![],
    )
    .execute(&client)
    .await?;

    let product = Product {
        sku: "A-100".into(),
        price_cents: 1999,
        cart_count: 0,
    };
    println!("binding {} (cart_count {})", product.sku, product.cart_count);

    let id: i64 = pgfluent::transaction!(&mut client, tx, {
        let mut b = Builder::new();
        b.with_transaction(&tx);
        let bindings = b.bind(&product);
        let table = b.table().unwrap_or("product").to_string();
        b.insert(&table, bindings.columns())
            .values(bindings.values())
            .returning(["id"]);
        let row = b.prepare(&tx).query_one().await?;
        let id: i64 = row.get(0);

        let mut b = Builder::new();
        b.with_transaction(&tx)
            .update(&table)
            .set([("price_cents", raw("price_cents - 100"))])
            .where_("id = ?", [id]);
        b.prepare(&tx).execute().await?;
        Ok::<i64, FluentError>(id)
    })?;

    let mut b = Builder::new();
    b.select(["sku", "price_cents"]).from("product").where_("id = ?", [id]);
    let row = b.prepare(&client).query_one().await?;
    println!("{} costs {}", row.get::<_, String>(0), row.get::<_, i64>(1));
    Ok(())
}
