use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};

use crate::models::book;

/// Insert a handful of demo books into an empty catalog.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if book::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let demo: [(&str, &str, Option<i32>, Option<&str>); 3] = [
        ("Dune", "Frank Herbert", Some(1965), Some("9780441172719")),
        (
            "The Left Hand of Darkness",
            "Ursula K. Le Guin",
            Some(1969),
            Some("9780441478125"),
        ),
        ("Neuromancer", "William Gibson", Some(1984), None),
    ];

    for (title, author, year, isbn) in demo {
        let now = chrono::Utc::now().to_rfc3339();
        let model = book::ActiveModel {
            title: Set(title.to_string()),
            author: Set(author.to_string()),
            publication_year: Set(year),
            isbn: Set(isbn.map(String::from)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        book::Entity::insert(model).exec(db).await?;
    }

    Ok(())
}
