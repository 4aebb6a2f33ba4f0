mod create_index;
pub use create_index::CreateIndex;

mod drop_index;
pub use drop_index::DropIndex;

mod name;
pub use name::Name;

#[derive(Debug, Clone)]
pub enum Statement {
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
}

impl Statement {
    pub fn is_create_index(&self) -> bool {
        matches!(self, Statement::CreateIndex(_))
    }

    pub fn is_drop_index(&self) -> bool {
        matches!(self, Statement::DropIndex(_))
    }
}
