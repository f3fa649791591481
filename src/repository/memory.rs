//! In-memory repositories used by the HTTP test-suite.
//!
//! They honour the same contracts as the PostgreSQL implementations:
//! unique usernames and emails, `NotFound` on missing rows, stable ordering
//! with `id` as the tie-breaker, and total counts written to the pageable.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::{AppError, Entity, Pageable, SortDirection, UniqueField, fetch_page};
use quill_models::{Comment, NewComment, NewPost, NewUser, Post, User};

use super::{CommentRepository, PostRepository, UserRepository};

struct Table<T> {
    rows: RwLock<BTreeMap<u64, T>>,
    last_id: AtomicU64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            last_id: AtomicU64::new(0),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&self) -> u64 {
        self.last_id.fetch_add(1, AtomicOrdering::SeqCst) + 1
    }
}

/// Sorts `rows` by the pageable's order and cuts out the requested page.
fn page_of<T>(
    mut rows: Vec<T>,
    pageable: &Pageable,
    compare: impl Fn(&T, &T, &str) -> Ordering,
) -> Vec<T> {
    let (field, direction) = pageable.order();
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    rows.into_iter()
        .skip(pageable.offset().max(0) as usize)
        .take(pageable.limit().max(0) as usize)
        .collect()
}

#[derive(Default)]
pub struct MemoryUserRepository {
    table: Table<User>,
}

impl MemoryUserRepository {
    fn ensure_unique(
        rows: &BTreeMap<u64, User>,
        id: Option<u64>,
        username: &str,
        email: &str,
    ) -> Result<(), AppError> {
        for other in rows.values().filter(|u| Some(u.id) != id) {
            if other.username == username {
                return Err(AppError::already_taken(UniqueField::Username));
            }
            if other.email == email {
                return Err(AppError::already_taken(UniqueField::Email));
            }
        }
        Ok(())
    }
}

fn compare_users(a: &User, b: &User, field: &str) -> Ordering {
    let ordering = match field {
        "id" => Ordering::Equal,
        "username" => a.username.cmp(&b.username),
        "email" => a.email.cmp(&b.email),
        // Enum columns sort by declaration order, as Postgres does.
        "role" => (a.role as u8).cmp(&(b.role as u8)),
        "status" => (a.status as u8).cmp(&(b.status as u8)),
        "updatedAt" => a.updated_at.cmp(&b.updated_at),
        _ => a.created_at.cmp(&b.created_at),
    };
    ordering.then(a.id.cmp(&b.id))
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut rows = self.table.rows.write().await;
        Self::ensure_unique(&rows, None, &user.username, &user.email)?;

        let now = Utc::now();
        let created = User {
            id: self.table.next_id(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            status: user.status,
            created_at: now,
            updated_at: now,
        };
        rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn read(&self, id: u64) -> Result<User, AppError> {
        self.table
            .rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(Entity::User))
    }

    async fn read_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let rows = self.table.rows.read().await;
        Ok(rows.values().find(|u| u.email == email).cloned())
    }

    async fn reads(&self, pageable: &mut Pageable) -> Result<Vec<User>, AppError> {
        let snapshot: Vec<User> = self.table.rows.read().await.values().cloned().collect();
        let total = snapshot.len() as i64;
        let page = page_of(snapshot, pageable, compare_users);

        fetch_page(
            pageable,
            async { Ok::<_, AppError>(total) },
            async { Ok::<_, AppError>(page) },
        )
        .await
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut rows = self.table.rows.write().await;
        if !rows.contains_key(&user.id) {
            return Err(AppError::not_found(Entity::User));
        }
        Self::ensure_unique(&rows, Some(user.id), &user.username, &user.email)?;

        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        rows.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<(), AppError> {
        self.table
            .rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(Entity::User))
    }
}

#[derive(Default)]
pub struct MemoryPostRepository {
    table: Table<Post>,
}

fn compare_posts(a: &Post, b: &Post, field: &str) -> Ordering {
    let ordering = match field {
        "id" => Ordering::Equal,
        "title" => a.title.cmp(&b.title),
        "createdBy" => a.created_by.cmp(&b.created_by),
        "updatedBy" => a.updated_by.cmp(&b.updated_by),
        "updatedAt" => a.updated_at.cmp(&b.updated_at),
        _ => a.created_at.cmp(&b.created_at),
    };
    ordering.then(a.id.cmp(&b.id))
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        let now = Utc::now();
        let created = Post {
            id: self.table.next_id(),
            title: post.title,
            body: post.body,
            created_by: post.author.clone(),
            updated_by: post.author,
            created_at: now,
            updated_at: now,
        };
        self.table
            .rows
            .write()
            .await
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn read(&self, id: u64) -> Result<Post, AppError> {
        self.table
            .rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(Entity::Post))
    }

    async fn reads(&self, pageable: &mut Pageable) -> Result<Vec<Post>, AppError> {
        let snapshot: Vec<Post> = self.table.rows.read().await.values().cloned().collect();
        let total = snapshot.len() as i64;
        let page = page_of(snapshot, pageable, compare_posts);

        fetch_page(
            pageable,
            async { Ok::<_, AppError>(total) },
            async { Ok::<_, AppError>(page) },
        )
        .await
    }

    async fn update(&self, post: &Post) -> Result<Post, AppError> {
        let mut rows = self.table.rows.write().await;
        if !rows.contains_key(&post.id) {
            return Err(AppError::not_found(Entity::Post));
        }

        let mut updated = post.clone();
        updated.updated_at = Utc::now();
        rows.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<(), AppError> {
        self.table
            .rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(Entity::Post))
    }
}

#[derive(Default)]
pub struct MemoryCommentRepository {
    table: Table<Comment>,
}

fn compare_comments(a: &Comment, b: &Comment, field: &str) -> Ordering {
    let ordering = match field {
        "id" => Ordering::Equal,
        "author" => a.author.cmp(&b.author),
        "updatedAt" => a.updated_at.cmp(&b.updated_at),
        _ => a.created_at.cmp(&b.created_at),
    };
    ordering.then(a.id.cmp(&b.id))
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, AppError> {
        let now = Utc::now();
        let created = Comment {
            id: self.table.next_id(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            author: comment.author,
            text: comment.text,
            created_at: now,
            updated_at: now,
        };
        self.table
            .rows
            .write()
            .await
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn read(&self, id: u64) -> Result<Comment, AppError> {
        self.table
            .rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(Entity::Comment))
    }

    async fn reads_by_post(
        &self,
        post_id: u64,
        pageable: &mut Pageable,
    ) -> Result<Vec<Comment>, AppError> {
        let snapshot: Vec<Comment> = self
            .table
            .rows
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        let total = snapshot.len() as i64;
        let page = page_of(snapshot, pageable, compare_comments);

        fetch_page(
            pageable,
            async { Ok::<_, AppError>(total) },
            async { Ok::<_, AppError>(page) },
        )
        .await
    }

    async fn delete(&self, id: u64) -> Result<(), AppError> {
        self.table
            .rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(Entity::Comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use quill_auth::{Role, Status};
    use quill_core::ErrorKind;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Registered,
            status: Status::Active,
        }
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let repo = MemoryUserRepository::default();
        repo.create(new_user("alice", "alice@quill.dev")).await.unwrap();

        let err = repo
            .create(new_user("alice", "other@quill.dev"))
            .await
            .unwrap_err();
        assert_matches!(err.kind, ErrorKind::AlreadyTaken(UniqueField::Username));

        let err = repo
            .create(new_user("bob", "alice@quill.dev"))
            .await
            .unwrap_err();
        assert_matches!(err.kind, ErrorKind::AlreadyTaken(UniqueField::Email));
    }

    #[tokio::test]
    async fn test_update_may_keep_own_username() {
        let repo = MemoryUserRepository::default();
        let mut user = repo.create(new_user("alice", "alice@quill.dev")).await.unwrap();
        user.role = Role::Mod;

        let updated = repo.update(&user).await.unwrap();
        assert_eq!(updated.role, Role::Mod);
    }

    #[tokio::test]
    async fn test_reads_sorts_and_counts() {
        let repo = MemoryUserRepository::default();
        for name in ["carol", "alice", "bob"] {
            repo.create(new_user(name, &format!("{name}@quill.dev")))
                .await
                .unwrap();
        }

        let mut pageable = Pageable::parse(Some(1), Some(2), Some("username,asc".into())).unwrap();
        let users = repo.reads(&mut pageable).await.unwrap();

        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob"]);
        assert_eq!(pageable.total_count(), 3);
    }

    #[tokio::test]
    async fn test_reads_sorts_by_role_and_status() {
        let repo = MemoryUserRepository::default();
        let mut reader = repo.create(new_user("reader", "reader@quill.dev")).await.unwrap();
        let mut admin = repo.create(new_user("admin", "admin@quill.dev")).await.unwrap();
        let mut moderator = repo.create(new_user("moddy", "moddy@quill.dev")).await.unwrap();
        admin.role = Role::Admin;
        repo.update(&admin).await.unwrap();
        moderator.role = Role::Mod;
        repo.update(&moderator).await.unwrap();
        reader.status = Status::Passive;
        repo.update(&reader).await.unwrap();

        let mut pageable = Pageable::parse(None, None, Some("role,asc".into())).unwrap();
        let users = repo.reads(&mut pageable).await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["admin", "moddy", "reader"]);

        let mut pageable = Pageable::parse(None, None, Some("status,desc".into())).unwrap();
        let users = repo.reads(&mut pageable).await.unwrap();
        assert_eq!(users[0].username, "reader");
    }

    #[tokio::test]
    async fn test_comments_are_filtered_by_post() {
        let repo = MemoryCommentRepository::default();
        for post_id in [1, 1, 2] {
            repo.create(NewComment {
                post_id,
                user_id: 1,
                author: "alice".into(),
                text: "hello".into(),
            })
            .await
            .unwrap();
        }

        let mut pageable = Pageable::default();
        let comments = repo.reads_by_post(1, &mut pageable).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(pageable.total_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let posts = MemoryPostRepository::default();
        assert_matches!(
            posts.delete(9).await.unwrap_err().kind,
            ErrorKind::NotFound(Entity::Post)
        );
    }
}
