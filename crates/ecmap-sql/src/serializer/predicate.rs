use super::{Comma, Formatter, Ident, ToSql};

use ecmap_core::schema::db::Predicate;

/// `a IS NOT NULL AND ... AND ECClassId IN (...)`
impl ToSql for &Predicate {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let serializer = f.serializer;
        let mut s = "";

        for column in &self.not_null {
            let column_name = Ident(&serializer.column(*column).name);
            fmt!(f, s column_name " IS NOT NULL");
            s = " AND ";
        }

        if let Some(filter) = &self.class_ids {
            let column_name = Ident(&serializer.column(filter.column).name);
            let classes = Comma(filter.classes.iter().copied());
            fmt!(f, s column_name " IN (" classes ")");
        }
    }
}
