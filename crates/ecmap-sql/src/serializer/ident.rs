use super::{Flavor, Formatter, ToSql};

pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let ident = self.0.as_ref();

        match f.serializer.flavor {
            // Brackets cannot escape `]`; such names fall back to double quotes
            Flavor::Sqlite if !ident.contains(']') => {
                f.dst.push('[');
                f.dst.push_str(ident);
                f.dst.push(']');
            }
            Flavor::Sqlite | Flavor::Postgresql => {
                f.dst.push('"');
                f.dst.push_str(&ident.replace('"', "\"\""));
                f.dst.push('"');
            }
        }
    }
}
