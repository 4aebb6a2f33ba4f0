use super::Formatter;

use ecmap_core::schema::app::ClassId;
use std::fmt::Write;

macro_rules! fmt {
    ($f:expr, $( $fragments:tt )*) => {{
        $(
            $fragments.to_sql($f);
        )*
    }};
}

pub(super) trait ToSql {
    fn to_sql(self, f: &mut Formatter<'_>);
}

impl ToSql for &str {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(self);
    }
}

/// Class ids are written as integer literals
impl ToSql for ClassId {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let _ = write!(f.dst, "{}", self.0);
    }
}
