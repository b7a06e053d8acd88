use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::{all_keys, Key};
use gcloud_spanner::mutation::{delete, insert, update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use crate::config::SpannerConfig;
use crate::store::{Book, BookId, BookStore};

const BOOKS_TABLE: &str = "books";

/// Book store backed by a Cloud Spanner table
///
/// Each book is one row of the `books` table; comments live in an
/// `ARRAY<STRING>` column. Cloning is cheap and shares the session pool.
#[derive(Clone)]
pub struct SpannerBookStore {
    inner: Arc<Client>,
}

impl SpannerBookStore {
    /// Connect to Spanner, provisioning the instance, database and table first
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST from the
    /// environment and talks to the emulator when it is set.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    fn book_from_row(row: &Row) -> Result<Book> {
        let id: String = row.column_by_name("id")?;
        let title: String = row.column_by_name("title")?;
        let comments: Vec<String> = row.column_by_name("comments")?;
        Ok(Book {
            id: BookId::new(id),
            title,
            comments,
        })
    }
}

#[async_trait]
impl BookStore for SpannerBookStore {
    async fn list(&self) -> Result<Vec<Book>> {
        let statement = Statement::new(
            "SELECT id, title, comments FROM books ORDER BY created_at ASC, id ASC"
        );

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to list books from Spanner")?;

        let mut books = Vec::new();
        while let Some(row) = result_set.next().await? {
            books.push(Self::book_from_row(&row)?);
        }

        tracing::debug!("Listed {} books", books.len());
        Ok(books)
    }

    async fn create(&self, title: &str) -> Result<Book> {
        let id = BookId::generate();
        let id_str = id.to_string();
        let title = title.to_string();
        let comments: Vec<String> = Vec::new();

        let mutation = insert(
            BOOKS_TABLE,
            &["id", "title", "comments", "created_at", "updated_at"],
            &[&id_str, &title, &comments, &CommitTimestamp::new(), &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to insert book into Spanner")?;

        tracing::debug!("Inserted book with id: {}", id);
        Ok(Book {
            id,
            title,
            comments,
        })
    }

    async fn find(&self, id: &BookId) -> Result<Option<Book>> {
        let mut statement = Statement::new(
            "SELECT id, title, comments FROM books WHERE id = @id"
        );
        statement.add_param("id", &id.to_string());

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query book from Spanner")?;

        if let Some(row) = result_set.next().await? {
            tracing::debug!("Read book with id: {}", id);
            Ok(Some(Self::book_from_row(&row)?))
        } else {
            tracing::debug!("Book not found with id: {}", id);
            Ok(None)
        }
    }

    /// Read-modify-write without a transaction. If the row is deleted between
    /// the read and the write, the update mutation fails with NOT_FOUND.
    async fn append_comment(&self, id: &BookId, comment: &str) -> Result<Option<Book>> {
        let Some(mut book) = self.find(id).await? else {
            return Ok(None);
        };
        book.comments.push(comment.to_string());

        let mutation = update(
            BOOKS_TABLE,
            &["id", "comments", "updated_at"],
            &[&id.to_string(), &book.comments, &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to append comment in Spanner")?;

        tracing::debug!("Appended comment to book {} ({} total)", id, book.comments.len());
        Ok(Some(book))
    }

    async fn delete(&self, id: &BookId) -> Result<bool> {
        // Spanner deletes of missing keys succeed silently, so look first.
        if self.find(id).await?.is_none() {
            return Ok(false);
        }

        let mutation = delete(BOOKS_TABLE, Key::new(&id.to_string()));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete book from Spanner")?;

        tracing::debug!("Deleted book with id: {}", id);
        Ok(true)
    }

    async fn delete_all(&self) -> Result<()> {
        let mutation = delete(BOOKS_TABLE, all_keys());

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete all books from Spanner")?;

        tracing::debug!("Deleted all books");
        Ok(())
    }

    /// Runs `SELECT 1` to confirm the database answers.
    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Automatically provision Spanner instance, database, and table
///
/// Checks whether the configured resources exist and creates the missing ones,
/// so a fresh emulator needs no manual setup.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_books_table_exists(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Settle one provisioning step from the outcome of its lookup
///
/// `create` only runs when the lookup answered `NotFound`; any other lookup
/// error aborts provisioning.
async fn ensure_exists<T, F>(
    kind: &str,
    path: &str,
    lookup: Result<T, Status>,
    create: F,
) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match lookup {
        Ok(_) => {
            tracing::info!("{} already exists: {}", kind, path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} not found, creating: {}", kind, path);
            create.await?;
            tracing::info!("{} created successfully: {}", kind, path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check {} existence: {}",
            kind.to_lowercase(),
            e.message()
        )),
    }
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let lookup = admin_client
        .instance()
        .get_instance(
            GetInstanceRequest {
                name: instance_path.to_string(),
                field_mask: None,
            },
            None,
        )
        .await;

    let instance_config = if config.emulator_host.is_some() {
        format!("{}/instanceConfigs/emulator-config", project_path)
    } else {
        format!("{}/instanceConfigs/regional-us-central1", project_path)
    };
    let create_request = CreateInstanceRequest {
        parent: project_path.to_string(),
        instance_id: config.instance.clone(),
        instance: Some(Instance {
            name: instance_path.to_string(),
            config: instance_config,
            display_name: format!("{} instance", config.instance),
            node_count: 1,
            ..Default::default()
        }),
    };

    ensure_exists("Instance", instance_path, lookup, async {
        admin_client
            .instance()
            .create_instance(create_request, None)
            .await
            .context("Failed to start instance creation")?
            .wait(None)
            .await
            .context("Failed to create instance")?;
        Ok(())
    })
    .await
}

async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let lookup = admin_client
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database_path.to_string(),
            },
            None,
        )
        .await;

    let database_id = database_path
        .split('/')
        .next_back()
        .context("Invalid database path")?;
    let create_request = CreateDatabaseRequest {
        parent: instance_path.to_string(),
        create_statement: format!("CREATE DATABASE `{}`", database_id),
        extra_statements: vec![],
        encryption_config: None,
        database_dialect: 1, // Google Standard SQL
        proto_descriptors: vec![],
    };

    ensure_exists("Database", database_path, lookup, async {
        admin_client
            .database()
            .create_database(create_request, None)
            .await
            .context("Failed to start database creation")?
            .wait(None)
            .await
            .context("Failed to create database")?;
        Ok(())
    })
    .await
}

fn books_table_ddl() -> String {
    r#"
CREATE TABLE books (
    id STRING(36) NOT NULL,
    title STRING(MAX) NOT NULL,
    comments ARRAY<STRING(MAX)> NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#
    .trim()
    .to_string()
}

fn declares_books_table(statements: &[String]) -> bool {
    statements
        .iter()
        .any(|stmt| stmt.contains("CREATE TABLE books") || stmt.contains("CREATE TABLE `books`"))
}

async fn ensure_books_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    if declares_books_table(&ddl_response.into_inner().statements) {
        tracing::info!("Table 'books' already exists");
        return Ok(());
    }

    tracing::info!("Table 'books' not found, creating...");

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![books_table_ddl()],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table 'books' created successfully");
    Ok(())
}
