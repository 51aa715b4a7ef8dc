pub use sea_orm_migration::prelude::*;

mod m20250118_000001_users;
mod m20250118_000002_groups;
mod m20250118_000003_group_memberships;
mod m20250202_000001_expenses;
mod m20250202_000002_expense_splits;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250118_000001_users::Migration),
            Box::new(m20250118_000002_groups::Migration),
            Box::new(m20250118_000003_group_memberships::Migration),
            Box::new(m20250202_000001_expenses::Migration),
            Box::new(m20250202_000002_expense_splits::Migration),
        ]
    }
}
