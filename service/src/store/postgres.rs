use async_trait::async_trait;
use tokio_postgres::{Client, NoTls};

use crate::{consts::consts::DEFAULT_TABLE, model::person::Person};

use super::{
    row::{person_from_row, person_to_params, PersonTableStatements},
    PersonStore, StoreError, StoreResult,
};

#[derive(Debug, Clone)]
pub struct PostgresOptions {
    /// libpq style connection string, e.g. `host=localhost user=postgres`
    pub connection: String,
    pub table: String,
}

impl PostgresOptions {
    pub fn new(connection: String) -> Self {
        Self {
            connection,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn set_table(mut self, table: String) -> Self {
        self.table = table;
        self
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub struct PgStore {
    client: Client,
    statements: PersonTableStatements,
}

impl PgStore {
    pub async fn connect(options: PostgresOptions) -> StoreResult<Self> {
        let statements = PersonTableStatements::new(&options.table)?;

        let (client, connection) = tokio_postgres::connect(&options.connection, NoTls).await?;

        // The connection drives the socket, it resolves once the client is dropped
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("Postgres connection error: {}", e);
            }
        });

        log::info!("Connected to postgres [Table: {}]", options.table);

        Ok(Self { client, statements })
    }
}

#[async_trait]
impl PersonStore for PgStore {
    async fn init(&self) -> StoreResult<()> {
        self.client
            .batch_execute(&self.statements.create_table)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, person), fields(email = %person.email))]
    async fn save(&self, person: Person) -> StoreResult<()> {
        self.client
            .execute(&self.statements.upsert, &person_to_params(&person))
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        let row = self
            .client
            .query_opt(&self.statements.select_by_email, &[&email])
            .await?;

        row.as_ref().map(person_from_row).transpose()
    }

    async fn delete(&self, email: &str) -> StoreResult<bool> {
        let deleted = self
            .client
            .execute(&self.statements.delete_by_email, &[&email])
            .await?;

        Ok(deleted > 0)
    }
}
