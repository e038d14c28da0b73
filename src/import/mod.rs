mod csv_import;

pub(crate) use csv_import::{import_file, ImportKind};
