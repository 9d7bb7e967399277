//! The five fixed dashboard query shapes.
//!
//! Every shape joins the production fact table to region, year and substance,
//! and reaches the class through the substance. That join path is required
//! even where the class is not projected, because the class filter depends on
//! it, and it never fans out since each hop is many-to-one.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::predicate::Predicate;

/// Row cap of the detail table.
pub const DETAIL_ROW_CAP: u64 = 500;

/// Row cap of the two rankings.
pub const RANKING_ROW_CAP: u64 = 20;

const FACT_JOINS: &str = "FROM REGISTRO_PRODUCAO rp
JOIN UF u ON u.id_sigla = rp.id_sigla
JOIN ANO a ON a.id_ano = rp.id_ano
JOIN SUBSTANCIA_MINERAL s ON s.id_substancia = rp.id_substancia
JOIN CLASSE_SUBSTANCIA c ON c.id_classe = s.id_classe";

const UNIT_JOIN: &str =
    "JOIN UNIDADE_CONTIDO uc ON uc.id_unidade_contido = rp.id_unidade_contido";

/// Identity of a dashboard query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryShape {
    /// Row-level records, newest year first.
    #[serde(rename = "detail")]
    DetailTable,
    /// Total ROM quantity per year, ascending by year.
    RomByYear,
    /// Total sale value per substance class, largest first.
    ValueByClass,
    /// Substances with the largest ROM quantity.
    #[serde(rename = "top-substances")]
    TopSubstancesByRom,
    /// Regions with the largest sale value.
    #[serde(rename = "top-regions")]
    TopRegionsByValue,
}

impl QueryShape {
    /// All shapes in rendering order.
    pub const ALL: [Self; 5] = [
        Self::DetailTable,
        Self::RomByYear,
        Self::ValueByClass,
        Self::TopSubstancesByRom,
        Self::TopRegionsByValue,
    ];

    /// Stable identifier, also used as the panel name in the API.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::DetailTable => "detail",
            Self::RomByYear => "rom-by-year",
            Self::ValueByClass => "value-by-class",
            Self::TopSubstancesByRom => "top-substances",
            Self::TopRegionsByValue => "top-regions",
        }
    }

    /// Parses a panel identifier produced by [`QueryShape::id`].
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.id() == id)
    }

    /// Maximum number of rows the query returns, if capped.
    #[must_use]
    pub const fn row_cap(self) -> Option<u64> {
        match self {
            Self::DetailTable => Some(DETAIL_ROW_CAP),
            Self::RomByYear | Self::ValueByClass => None,
            Self::TopSubstancesByRom | Self::TopRegionsByValue => Some(RANKING_ROW_CAP),
        }
    }

    /// Renders the complete SQL for this shape under `predicate`.
    ///
    /// Measures are cast to REAL so they decode uniformly into decimals
    /// whatever storage class the dataset used.
    #[must_use]
    pub fn sql(self, predicate: &Predicate) -> String {
        let where_clause = predicate.where_clause();
        match self {
            Self::DetailTable => format!(
                "SELECT u.sigla_uf AS region, a.ano AS year, c.nome_classe AS class_name,
       s.nome_substancia AS substance, uc.unidade AS unit,
       CAST(rp.quantidade_rom AS REAL) AS rom_quantity,
       CAST(rp.quantidade_contido AS REAL) AS contained_quantity,
       CAST(rp.quantidade_venda AS REAL) AS sale_quantity,
       CAST(rp.valor_venda AS REAL) AS sale_value
{FACT_JOINS}
{UNIT_JOIN}
{where_clause}
ORDER BY a.ano DESC, u.sigla_uf, s.nome_substancia
LIMIT {DETAIL_ROW_CAP}"
            ),
            Self::RomByYear => format!(
                "SELECT a.ano AS year, CAST(SUM(rp.quantidade_rom) AS REAL) AS total
{FACT_JOINS}
{where_clause}
GROUP BY a.ano
ORDER BY a.ano"
            ),
            Self::ValueByClass => format!(
                "SELECT c.nome_classe AS category, CAST(SUM(rp.valor_venda) AS REAL) AS total
{FACT_JOINS}
{where_clause}
GROUP BY c.nome_classe
ORDER BY total DESC"
            ),
            Self::TopSubstancesByRom => format!(
                "SELECT s.nome_substancia AS category, CAST(SUM(rp.quantidade_rom) AS REAL) AS total
{FACT_JOINS}
{where_clause}
GROUP BY s.nome_substancia
ORDER BY total DESC
LIMIT {RANKING_ROW_CAP}"
            ),
            Self::TopRegionsByValue => format!(
                "SELECT u.sigla_uf AS category, CAST(SUM(rp.valor_venda) AS REAL) AS total
{FACT_JOINS}
{where_clause}
GROUP BY u.sigla_uf
ORDER BY total DESC
LIMIT {RANKING_ROW_CAP}"
            ),
        }
    }
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
