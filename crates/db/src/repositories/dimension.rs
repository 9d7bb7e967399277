//! Dimension repository for filter option lists.

use lavra_core::dimension::{DimensionOptions, Region, Substance, SubstanceClass, Year};
use lavra_shared::types::{ClassId, RegionId, SubstanceId, YearId};
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement};
use tracing::debug;

const REGIONS_SQL: &str = "SELECT id_sigla, sigla_uf FROM UF ORDER BY sigla_uf";
const YEARS_SQL: &str = "SELECT id_ano, ano FROM ANO ORDER BY ano";
const CLASSES_SQL: &str =
    "SELECT id_classe, nome_classe FROM CLASSE_SUBSTANCIA ORDER BY nome_classe";
const SUBSTANCES_SQL: &str = r"SELECT s.id_substancia, s.nome_substancia, c.nome_classe
FROM SUBSTANCIA_MINERAL s
JOIN CLASSE_SUBSTANCIA c ON c.id_classe = s.id_classe
ORDER BY s.nome_substancia, c.nome_classe";

#[derive(Debug, FromQueryResult)]
struct RegionRow {
    id_sigla: i32,
    sigla_uf: String,
}

#[derive(Debug, FromQueryResult)]
struct YearRow {
    id_ano: i32,
    ano: i32,
}

#[derive(Debug, FromQueryResult)]
struct ClassRow {
    id_classe: i32,
    nome_classe: String,
}

#[derive(Debug, FromQueryResult)]
struct SubstanceRow {
    id_substancia: i32,
    nome_substancia: String,
    nome_classe: String,
}

/// Loads the lookup sets behind the four filters.
#[derive(Debug, Clone)]
pub struct DimensionRepository {
    db: DatabaseConnection,
}

impl DimensionRepository {
    /// Creates a new dimension repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every option list.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be read.
    pub async fn load_options(&self) -> Result<DimensionOptions, DbErr> {
        let options = DimensionOptions {
            regions: self.regions().await?,
            years: self.years().await?,
            classes: self.classes().await?,
            substances: self.substances().await?,
        };

        debug!(
            regions = options.regions.len(),
            years = options.years.len(),
            classes = options.classes.len(),
            substances = options.substances.len(),
            "dimension options loaded"
        );

        Ok(options)
    }

    /// Lists regions ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn regions(&self) -> Result<Vec<Region>, DbErr> {
        let rows = RegionRow::find_by_statement(statement(REGIONS_SQL))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| Region {
                id: RegionId::new(r.id_sigla),
                code: r.sigla_uf,
            })
            .collect())
    }

    /// Lists years in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn years(&self) -> Result<Vec<Year>, DbErr> {
        let rows = YearRow::find_by_statement(statement(YEARS_SQL))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| Year {
                id: YearId::new(r.id_ano),
                year: r.ano,
            })
            .collect())
    }

    /// Lists substance classes ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn classes(&self) -> Result<Vec<SubstanceClass>, DbErr> {
        let rows = ClassRow::find_by_statement(statement(CLASSES_SQL))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| SubstanceClass {
                id: ClassId::new(r.id_classe),
                name: r.nome_classe,
            })
            .collect())
    }

    /// Lists substances with their class name, ordered by substance name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn substances(&self) -> Result<Vec<Substance>, DbErr> {
        let rows = SubstanceRow::find_by_statement(statement(SUBSTANCES_SQL))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| Substance {
                id: SubstanceId::new(r.id_substancia),
                name: r.nome_substancia,
                class_name: r.nome_classe,
            })
            .collect())
    }
}

fn statement(sql: &str) -> Statement {
    Statement::from_string(DbBackend::Sqlite, sql)
}
