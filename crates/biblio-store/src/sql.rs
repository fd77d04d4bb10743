//! SQL text builders. Values are always `$n` placeholders.

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Namespace-qualified, quoted table reference.
pub fn qualified(namespace: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(namespace), quote_ident(table))
}

fn column_list<S: AsRef<str>>(columns: &[S]) -> String {
    columns
        .iter()
        .map(|column| quote_ident(column.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `INSERT` with one placeholder per column. An empty column list inserts
/// a row of defaults.
pub fn insert_statement<S: AsRef<str>>(namespace: &str, table: &str, columns: &[S]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", qualified(namespace, table));
    }
    let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("${idx}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified(namespace, table),
        column_list(columns),
        placeholders.join(", ")
    )
}

pub fn update_statement(namespace: &str, table: &str, column: &str, key: &str) -> String {
    format!(
        "UPDATE {} SET {} = $1 WHERE {} = $2",
        qualified(namespace, table),
        quote_ident(column),
        quote_ident(key)
    )
}

pub fn delete_statement(namespace: &str, table: &str, key: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1",
        qualified(namespace, table),
        quote_ident(key)
    )
}

pub fn select_all_statement<S: AsRef<str>>(
    namespace: &str,
    table: &str,
    columns: &[S],
    key: &str,
) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(columns),
        qualified(namespace, table),
        quote_ident(key)
    )
}

/// Max of an integer key, `0` for an empty table.
pub fn max_key_statement(namespace: &str, table: &str, key: &str) -> String {
    format!(
        "SELECT COALESCE(MAX({}), 0) FROM {}",
        quote_ident(key),
        qualified(namespace, table)
    )
}

pub fn count_statement(namespace: &str, table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", qualified(namespace, table))
}

/// The key at a zero-based position (`$1`) in key order.
pub fn nth_key_statement(namespace: &str, table: &str, key: &str) -> String {
    format!(
        "SELECT {key} FROM {} ORDER BY {key} OFFSET $1 LIMIT 1",
        qualified(namespace, table),
        key = quote_ident(key)
    )
}

/// Move the key's owned sequence (if any) up to the table's max key.
///
/// Binds the quoted table reference as `$1` and the key column as `$2`;
/// a key without a sequence makes `setval` a no-op returning NULL.
pub fn sync_key_sequence_statement(namespace: &str, table: &str, key: &str) -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence($1, $2), GREATEST(MAX({}), 1)) FROM {}",
        quote_ident(key),
        qualified(namespace, table)
    )
}

/// Identifiers for a grouped-count report.
pub struct GroupedCountParts<'a> {
    pub namespace: &'a str,
    pub table: &'a str,
    pub join_table: &'a str,
    pub join_key: &'a str,
    pub counted_key: &'a str,
    pub filter_column: &'a str,
    pub group_column: &'a str,
}

pub fn grouped_count_statement(parts: &GroupedCountParts<'_>) -> String {
    let join_key = quote_ident(parts.join_key);
    let group = quote_ident(parts.group_column);
    format!(
        "SELECT t.{group} AS group_value, COUNT(j.{counted}) AS total \
         FROM {table} t JOIN {join} j ON j.{join_key} = t.{join_key} \
         WHERE t.{filter} = $1 \
         GROUP BY t.{group} \
         ORDER BY total DESC, group_value ASC",
        counted = quote_ident(parts.counted_key),
        table = qualified(parts.namespace, parts.table),
        join = qualified(parts.namespace, parts.join_table),
        filter = quote_ident(parts.filter_column),
    )
}
