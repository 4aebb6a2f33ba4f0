use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::{self, Statement};

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::CreateIndex(stmt) => stmt.to_sql(f),
            Statement::DropIndex(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::CreateIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let serializer = f.serializer;
        let table = serializer.table(self.on);
        let index_name = &self.name;
        let table_name = Ident(&table.name);
        let columns = Comma(
            self.columns
                .iter()
                .map(|column| Ident(&serializer.column(*column).name)),
        );
        let unique = if self.unique { "UNIQUE " } else { "" };

        fmt!(f, "CREATE " unique "INDEX " index_name " ON " table_name " (" columns ")");

        if let Some(predicate) = &self.predicate {
            fmt!(f, " WHERE " predicate);
        }
    }
}

impl ToSql for &stmt::DropIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let index_name = &self.name;
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };

        fmt!(f, "DROP INDEX " if_exists index_name);
    }
}
