//! `tracing` output for executed statements.

use tracing::Level;

/// Which execution call issued the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecKind {
    Query,
    QueryOne,
    QueryOpt,
    Execute,
}

/// Controls the event emitted (target `pgfluent.sql`) before each statement runs.
#[derive(Debug, Clone)]
pub struct SqlLog {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLog {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn display_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                format!("{}...", truncate_sql_bytes(sql, max)).into()
            }
            _ => sql.into(),
        }
    }

    pub(crate) fn emit(&self, kind: ExecKind, sql: &str, param_count: usize, in_transaction: bool) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.display_sql(sql);
        emit_at_level!(
            self.level,
            target: "pgfluent.sql",
            kind = ?kind,
            param_count,
            in_transaction,
            sql = %sql,
        );
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sql_is_untouched() {
        let log = SqlLog::new();
        assert_eq!(log.display_sql("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn long_sql_is_truncated() {
        let log = SqlLog::new().max_sql_length(6);
        assert_eq!(log.display_sql("SELECT * FROM users"), "SELECT...");
        assert_eq!(SqlLog::new().no_truncate().display_sql("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; cutting at byte 2 would split it.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
        assert_eq!(truncate_sql_bytes("aé", 3), "aé");
    }
}
