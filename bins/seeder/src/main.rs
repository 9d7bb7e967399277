//! Demo dataset seeder for Lavra development.
//!
//! Creates the schema if needed and fills it with a small, deterministic
//! production dataset. Existing rows are kept.
//!
//! Usage: `DATABASE_URL=sqlite://data/lavra.db?mode=rwc cargo run --bin seeder`

use anyhow::Context;
use lavra_db::migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection};

const REGIONS: [&str; 6] = ["BA", "GO", "MG", "MT", "PA", "SP"];
const YEARS: [i32; 5] = [2018, 2019, 2020, 2021, 2022];
const CLASSES: [&str; 3] = ["Gemas e Diamantes", "Metálicos", "Não Metálicos"];
const UNITS: [&str; 3] = ["t", "g", "ct"];

/// (name, class index, unit index, base ROM)
const SUBSTANCES: [(&str, usize, usize, i64); 10] = [
    ("Ferro", 1, 0, 420_000),
    ("Ouro", 1, 1, 1_800),
    ("Cobre", 1, 0, 95_000),
    ("Bauxita", 1, 0, 160_000),
    ("Nióbio", 1, 0, 12_000),
    ("Calcário", 2, 0, 210_000),
    ("Areia", 2, 0, 330_000),
    ("Fosfato", 2, 0, 48_000),
    ("Caulim", 2, 0, 21_000),
    ("Diamante", 0, 2, 40),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("LAVRA__DATABASE__URL"))
        .context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = lavra_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Applying schema...");
    Migrator::up(&db, None).await?;

    println!("Seeding dimensions...");
    seed_dimensions(&db).await?;

    println!("Seeding production records...");
    let inserted = seed_records(&db).await?;

    println!("Seeding complete! ({inserted} new records)");
    Ok(())
}

fn named_rows(names: &[&str]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("({}, '{name}')", i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Seeds UF, ANO, CLASSE_SUBSTANCIA, UNIDADE_CONTIDO and SUBSTANCIA_MINERAL.
async fn seed_dimensions(db: &DatabaseConnection) -> anyhow::Result<()> {
    let years = YEARS
        .iter()
        .enumerate()
        .map(|(i, year)| format!("({}, {year})", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let substances = SUBSTANCES
        .iter()
        .enumerate()
        .map(|(i, (name, class, _, _))| format!("({}, '{name}', {})", i + 1, class + 1))
        .collect::<Vec<_>>()
        .join(", ");

    let statements = [
        format!("INSERT OR IGNORE INTO UF (id_sigla, sigla_uf) VALUES {};", named_rows(&REGIONS)),
        format!("INSERT OR IGNORE INTO ANO (id_ano, ano) VALUES {years};"),
        format!(
            "INSERT OR IGNORE INTO CLASSE_SUBSTANCIA (id_classe, nome_classe) VALUES {};",
            named_rows(&CLASSES)
        ),
        format!(
            "INSERT OR IGNORE INTO UNIDADE_CONTIDO (id_unidade_contido, unidade) VALUES {};",
            named_rows(&UNITS)
        ),
        format!(
            "INSERT OR IGNORE INTO SUBSTANCIA_MINERAL (id_substancia, nome_substancia, id_classe) VALUES {substances};"
        ),
    ];

    for sql in &statements {
        db.execute_unprepared(sql).await?;
    }
    Ok(())
}

/// Seeds one record per (region, year, substance), skipping existing ones.
///
/// Not every region mines every substance; sale figures are missing for the
/// first year of each series.
async fn seed_records(db: &DatabaseConnection) -> anyhow::Result<u64> {
    let mut inserted = 0;

    for (y, _) in YEARS.iter().enumerate() {
        let year_step = i64::try_from(y)?;
        let mut rows = Vec::new();
        for (r, _) in REGIONS.iter().enumerate() {
            let region_step = i64::try_from(r)?;
            for (s, &(_, _, unit, base)) in SUBSTANCES.iter().enumerate() {
                if (r + s) % 4 == 3 {
                    continue;
                }

                let growth = Decimal::new(100 + 5 * year_step, 2);
                let share = Decimal::new(40 + 12 * region_step, 2);
                let rom = (Decimal::from(base) * growth * share).round_dp(2);
                let contained = (rom * Decimal::new(35, 2)).round_dp(2);
                let (sale_quantity, sale_value) = if y == 0 {
                    ("NULL".to_string(), "NULL".to_string())
                } else {
                    let sold = (rom * Decimal::new(92, 2)).round_dp(2);
                    (sold.to_string(), (sold * Decimal::new(73, 1)).round_dp(2).to_string())
                };

                rows.push(format!(
                    "({}, {}, {}, {}, {rom}, {contained}, {sale_quantity}, {sale_value})",
                    r + 1,
                    y + 1,
                    s + 1,
                    unit + 1
                ));
            }
        }

        let result = db
            .execute_unprepared(&format!(
                "INSERT OR IGNORE INTO REGISTRO_PRODUCAO (id_sigla, id_ano, id_substancia, \
                 id_unidade_contido, quantidade_rom, quantidade_contido, quantidade_venda, \
                 valor_venda) VALUES {};",
                rows.join(", ")
            ))
            .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}
