use super::{Formatter, Ident, ToSql};

use crate::stmt;

impl ToSql for &stmt::Name {
    fn to_sql(self, f: &mut Formatter<'_>) {
        Ident(&self.0).to_sql(f);
    }
}
