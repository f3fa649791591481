use std::time::Instant;

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence, Words};
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};

use quill_auth::{Role, Status};
use quill_core::hash_password_with_cost;

/// Every seeded account shares this password.
pub const SEED_PASSWORD: &str = "password123";

/// bcrypt cost for seeded accounts. Real accounts use the library default.
const SEED_BCRYPT_COST: u32 = 4;

// Postgres caps bind parameters at 65535 per statement.
const BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct SeedCounts {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
}

impl Default for SeedCounts {
    fn default() -> Self {
        Self {
            users: 50,
            posts: 100,
            comments: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSeed {
    pub title: String,
    pub body: String,
    pub author: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSeed {
    pub text: String,
    pub post: usize,
    pub author: usize,
}

/// Generated rows, before insertion. Post and comment authors index into
/// `users`; comment posts index into `posts`.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub users: Vec<UserSeed>,
    pub posts: Vec<PostSeed>,
    pub comments: Vec<CommentSeed>,
}

/// Builds fake rows in parallel. Every value respects the API's own
/// validation limits, so seeded data round-trips through the endpoints.
///
/// Every tenth account, starting with the first, is a mod; posts are
/// attributed to mods only.
pub fn generate(counts: SeedCounts) -> SeedData {
    let users: Vec<UserSeed> = (0..counts.users).into_par_iter().map(user_seed).collect();

    if users.is_empty() {
        return SeedData::default();
    }

    let writers: Vec<usize> = users
        .iter()
        .enumerate()
        .filter(|(_, u)| u.role != Role::Registered)
        .map(|(i, _)| i)
        .collect();

    let posts: Vec<PostSeed> = (0..counts.posts)
        .into_par_iter()
        .map(|i| PostSeed {
            title: post_title(),
            body: Paragraph(2..5).fake(),
            author: writers[i % writers.len()],
        })
        .collect();

    let comments: Vec<CommentSeed> = if posts.is_empty() {
        Vec::new()
    } else {
        (0..counts.comments)
            .into_par_iter()
            .map(|i| CommentSeed {
                text: truncate(Sentence(3..10).fake(), 100),
                post: i % posts.len(),
                author: (i * 7) % users.len(),
            })
            .collect()
    };

    SeedData {
        users,
        posts,
        comments,
    }
}

fn user_seed(index: usize) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let first = ascii_lower(&first_name);
    let last = ascii_lower(&last_name);

    let role = match index % 10 {
        0 => Role::Mod,
        _ => Role::Registered,
    };

    UserSeed {
        username: format!("{}{}", truncate(first.clone(), 12), index),
        email: format!("{}.{}+{}@example.com", first, last, index),
        role,
    }
}

fn post_title() -> String {
    let words: Vec<String> = Words(1..4).fake();
    let title = truncate(words.join(" "), 21);
    if title.chars().count() < 3 {
        format!("{title} post")
    } else {
        title
    }
}

fn ascii_lower(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        "user".to_string()
    } else {
        cleaned
    }
}

fn truncate(s: String, max: usize) -> String {
    s.chars().take(max).collect::<String>().trim_end().to_string()
}

/// Inserts generated data inside one transaction and returns the number of
/// users, posts and comments written.
pub async fn seed_database(db: &PgPool, counts: SeedCounts) -> anyhow::Result<SeedCounts> {
    let start = Instant::now();

    println!("🌱 Seeding database...");
    println!(
        "   - {} users, {} posts, {} comments",
        counts.users, counts.posts, counts.comments
    );

    let data = generate(counts);
    println!("   ✓ Generated data in {:?}", start.elapsed());

    let password_hash =
        hash_password_with_cost(SEED_PASSWORD, SEED_BCRYPT_COST).map_err(|e| e.error)?;

    let mut tx = db.begin().await?;

    let mut user_ids: Vec<i64> = Vec::with_capacity(data.users.len());
    for chunk in data.users.chunks(BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO users (username, email, password_hash, role, status) ",
        );
        builder.push_values(chunk, |mut row, user| {
            row.push_bind(&user.username)
                .push_bind(&user.email)
                .push_bind(&password_hash)
                .push_bind(user.role)
                .push_bind(Status::Active);
        });
        builder.push(" RETURNING id");

        let ids: Vec<i64> = builder.build_query_scalar::<i64>().fetch_all(&mut *tx).await?;
        user_ids.extend(ids);
    }

    let mut post_ids: Vec<i64> = Vec::with_capacity(data.posts.len());
    for chunk in data.posts.chunks(BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO posts (title, body, created_by, updated_by) ");
        builder.push_values(chunk, |mut row, post| {
            let author = &data.users[post.author].username;
            row.push_bind(&post.title)
                .push_bind(&post.body)
                .push_bind(author)
                .push_bind(author);
        });
        builder.push(" RETURNING id");

        let ids: Vec<i64> = builder.build_query_scalar::<i64>().fetch_all(&mut *tx).await?;
        post_ids.extend(ids);
    }

    for chunk in data.comments.chunks(BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO comments (post_id, user_id, author, text) ");
        builder.push_values(chunk, |mut row, comment| {
            row.push_bind(post_ids[comment.post])
                .push_bind(user_ids[comment.author])
                .push_bind(&data.users[comment.author].username)
                .push_bind(&comment.text);
        });
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!("✅ Seeding complete in {:?}", start.elapsed());
    println!("📝 Default password for all users: {SEED_PASSWORD}");

    Ok(SeedCounts {
        users: data.users.len(),
        posts: data.posts.len(),
        comments: data.comments.len(),
    })
}
