use crate::error::{DatabaseError, DatabaseErrorExt};
use finman_domain::constants::{BUDGET_PLANS, TRANSACTIONS, USERNAME_FIELD, USERS};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use tracing::{debug, info};

/// One idempotent schema step.
#[derive(Debug)]
pub(crate) struct SchemaStep {
    pub name: &'static str,
    pub statement: String,
}

/// Collections and indexes every finman database needs.
///
/// Tables stay schemaless so documents keep their stored field names. Usernames are unique
/// within the users collection.
pub(crate) fn builtin_schema() -> Vec<SchemaStep> {
    let mut steps = Vec::new();
    for table in [USERS, TRANSACTIONS, BUDGET_PLANS] {
        steps.push(SchemaStep {
            name: table,
            statement: format!("DEFINE TABLE IF NOT EXISTS `{table}` SCHEMALESS"),
        });
    }

    steps.push(SchemaStep {
        name: "users_username",
        statement: format!(
            "DEFINE INDEX IF NOT EXISTS users_username ON TABLE `{USERS}` FIELDS {USERNAME_FIELD} UNIQUE"
        ),
    });
    for (name, table) in [("transactions_username", TRANSACTIONS), ("budget_plans_username", BUDGET_PLANS)] {
        steps.push(SchemaStep {
            name,
            statement: format!(
                "DEFINE INDEX IF NOT EXISTS {name} ON TABLE `{table}` FIELDS {USERNAME_FIELD}"
            ),
        });
    }

    steps
}

#[derive(Debug)]
pub(crate) struct SchemaRunner {
    db: Surreal<Any>,
}

impl SchemaRunner {
    #[must_use]
    pub(crate) const fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    /// Applies every step in a single transaction and returns the number of steps.
    pub(crate) async fn run(&self) -> Result<usize, DatabaseError> {
        let steps = builtin_schema();
        for step in &steps {
            debug!(step = step.name, "Schema step queued");
        }

        let body = steps.iter().map(|s| format!("{};", s.statement)).collect::<Vec<_>>().join("\n");
        let query = format!("BEGIN TRANSACTION;\n{body}\nCOMMIT TRANSACTION;");

        self.db
            .query(query)
            .await
            .context("Applying schema")?
            .check()
            .map_err(|e| DatabaseError::Schema {
                message: e.to_string().into(),
                context: Some("Schema statement rejected".into()),
            })?;

        info!(steps = steps.len(), "Schema is up to date");
        Ok(steps.len())
    }
}
