//! Production repository running the five dashboard query shapes.
//!
//! Every query is built by [`QueryShape::sql`] from the shared predicate and
//! executed with the predicate's values bound in ordinal order.

use lavra_core::dashboard::{CategoryTotal, DetailRow, Predicate, QueryShape, YearTotal};
use lavra_core::dimension::FilterValue;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement, Value};
use tracing::{debug, instrument};

#[derive(Debug, FromQueryResult)]
struct DetailRecord {
    region: String,
    year: i32,
    class_name: String,
    substance: String,
    unit: String,
    rom_quantity: Option<Decimal>,
    contained_quantity: Option<Decimal>,
    sale_quantity: Option<Decimal>,
    sale_value: Option<Decimal>,
}

impl From<DetailRecord> for DetailRow {
    fn from(r: DetailRecord) -> Self {
        Self {
            region: r.region,
            year: r.year,
            class_name: r.class_name,
            substance: r.substance,
            unit: r.unit,
            rom_quantity: r.rom_quantity,
            contained_quantity: r.contained_quantity,
            sale_quantity: r.sale_quantity,
            sale_value: r.sale_value,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct YearTotalRecord {
    year: i32,
    total: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct CategoryTotalRecord {
    category: String,
    total: Option<Decimal>,
}

impl From<CategoryTotalRecord> for CategoryTotal {
    fn from(r: CategoryTotalRecord) -> Self {
        Self {
            category: r.category,
            total: r.total,
        }
    }
}

/// Production repository for aggregate queries over `REGISTRO_PRODUCAO`.
#[derive(Debug, Clone)]
pub struct ProductionRepository {
    db: DatabaseConnection,
}

impl ProductionRepository {
    /// Creates a new production repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Matching records with their dimension labels, newest year first,
    /// capped at 500 rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self, predicate), fields(predicate = %predicate))]
    pub async fn query_detail(&self, predicate: &Predicate) -> Result<Vec<DetailRow>, DbErr> {
        let rows = DetailRecord::find_by_statement(statement(QueryShape::DetailTable, predicate))
            .all(&self.db)
            .await?;
        debug!(rows = rows.len(), "detail query finished");
        Ok(rows.into_iter().map(DetailRow::from).collect())
    }

    /// ROM quantity summed per year, ascending by year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self, predicate), fields(predicate = %predicate))]
    pub async fn query_rom_by_year(&self, predicate: &Predicate) -> Result<Vec<YearTotal>, DbErr> {
        let rows = YearTotalRecord::find_by_statement(statement(QueryShape::RomByYear, predicate))
            .all(&self.db)
            .await?;
        debug!(rows = rows.len(), "rom-by-year query finished");
        Ok(rows
            .into_iter()
            .map(|r| YearTotal {
                year: r.year,
                total: r.total,
            })
            .collect())
    }

    /// Sale value summed per substance class, largest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self, predicate), fields(predicate = %predicate))]
    pub async fn query_value_by_class(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<CategoryTotal>, DbErr> {
        self.category_totals(QueryShape::ValueByClass, predicate).await
    }

    /// The 20 substances with the largest ROM quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self, predicate), fields(predicate = %predicate))]
    pub async fn query_top_substances_by_rom(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<CategoryTotal>, DbErr> {
        self.category_totals(QueryShape::TopSubstancesByRom, predicate)
            .await
    }

    /// The 20 regions with the largest sale value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self, predicate), fields(predicate = %predicate))]
    pub async fn query_top_regions_by_value(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<CategoryTotal>, DbErr> {
        self.category_totals(QueryShape::TopRegionsByValue, predicate)
            .await
    }

    async fn category_totals(
        &self,
        shape: QueryShape,
        predicate: &Predicate,
    ) -> Result<Vec<CategoryTotal>, DbErr> {
        let rows = CategoryTotalRecord::find_by_statement(statement(shape, predicate))
            .all(&self.db)
            .await?;
        debug!(shape = %shape, rows = rows.len(), "category query finished");
        Ok(rows.into_iter().map(CategoryTotal::from).collect())
    }
}

/// Builds the statement for `shape`, binding values in placeholder order.
fn statement(shape: QueryShape, predicate: &Predicate) -> Statement {
    let values = predicate.values().into_iter().map(|value| match value {
        FilterValue::Integer(n) => Value::from(n),
        FilterValue::Text(s) => Value::from(s),
    });
    Statement::from_sql_and_values(DbBackend::Sqlite, shape.sql(predicate), values)
}
