//! Shared fixture: an in-memory production dataset.
//!
//! 3 regions x 7 years x 24 substances gives 504 records, enough to hit the
//! detail cap and the ranking cap.

#![allow(dead_code)]

use lavra_db::migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

pub const REGIONS: [&str; 3] = ["MG", "PA", "SP"];
pub const YEARS: [i32; 7] = [2015, 2016, 2017, 2018, 2019, 2020, 2021];
pub const CLASSES: [&str; 3] = ["Gemas e Diamantes", "Metálicos", "Não Metálicos"];
pub const UNITS: [&str; 3] = ["t", "kg", "ct"];

/// (name, class index, unit index)
pub const SUBSTANCES: [(&str, usize, usize); 24] = [
    ("Ferro", 1, 0),
    ("Ouro", 1, 1),
    ("Cobre", 1, 0),
    ("Bauxita", 1, 0),
    ("Manganês", 1, 0),
    ("Níquel", 1, 0),
    ("Zinco", 1, 0),
    ("Estanho", 1, 0),
    ("Nióbio", 1, 0),
    ("Cromo", 1, 0),
    ("Vanádio", 1, 0),
    ("Lítio", 1, 0),
    ("Calcário", 2, 0),
    ("Areia", 2, 0),
    ("Brita", 2, 0),
    ("Argila", 2, 0),
    ("Caulim", 2, 0),
    ("Fosfato", 2, 0),
    ("Potássio", 2, 0),
    ("Gipsita", 2, 0),
    ("Talco", 2, 0),
    ("Grafita", 2, 0),
    ("Quartzo", 2, 0),
    ("Diamante", 0, 2),
];

/// Index of the substance whose sale figures are all null.
pub const UNSOLD: usize = 23;

/// One generated production record.
#[derive(Debug, Clone)]
pub struct FixtureRecord {
    pub region: &'static str,
    pub year: i32,
    pub class_name: &'static str,
    pub substance: &'static str,
    pub unit: &'static str,
    pub rom: Decimal,
    pub contained: Decimal,
    pub sale_quantity: Option<Decimal>,
    pub sale_value: Option<Decimal>,
}

/// Every record of the dataset, in insertion order.
pub fn records() -> Vec<FixtureRecord> {
    let mut out = Vec::new();
    for (y, &year) in YEARS.iter().enumerate() {
        for (r, &region) in REGIONS.iter().enumerate() {
            for (s, &(substance, class, unit)) in SUBSTANCES.iter().enumerate() {
                let rom = Decimal::from((s + 1) * 100 + y * 10 + r);
                let sold = s != UNSOLD;
                out.push(FixtureRecord {
                    region,
                    year,
                    class_name: CLASSES[class],
                    substance,
                    unit: UNITS[unit],
                    rom,
                    contained: rom / Decimal::TWO,
                    sale_quantity: sold.then(|| rom - Decimal::ONE),
                    sale_value: sold.then(|| rom * Decimal::from(3) + Decimal::new(25, 2)),
                });
            }
        }
    }
    out
}

/// Opens an empty in-memory database with the schema applied.
pub async fn empty_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

/// Opens an in-memory database loaded with [`records`].
pub async fn seeded_db() -> DatabaseConnection {
    let db = empty_db().await;

    exec(&db, &insert_names("UF", "id_sigla, sigla_uf", &REGIONS)).await;
    exec(&db, &insert_names("CLASSE_SUBSTANCIA", "id_classe, nome_classe", &CLASSES)).await;
    exec(&db, &insert_names("UNIDADE_CONTIDO", "id_unidade_contido, unidade", &UNITS)).await;

    let years: Vec<String> = YEARS
        .iter()
        .enumerate()
        .map(|(i, year)| format!("({}, {year})", i + 1))
        .collect();
    exec(&db, &format!("INSERT INTO ANO (id_ano, ano) VALUES {};", years.join(", "))).await;

    let substances: Vec<String> = SUBSTANCES
        .iter()
        .enumerate()
        .map(|(i, (name, class, _))| format!("({}, '{name}', {})", i + 1, class + 1))
        .collect();
    exec(
        &db,
        &format!(
            "INSERT INTO SUBSTANCIA_MINERAL (id_substancia, nome_substancia, id_classe) VALUES {};",
            substances.join(", ")
        ),
    )
    .await;

    for (y, _) in YEARS.iter().enumerate() {
        let mut rows = Vec::new();
        for (r, _) in REGIONS.iter().enumerate() {
            for (s, (_, _, unit)) in SUBSTANCES.iter().enumerate() {
                let rom = (s + 1) * 100 + y * 10 + r;
                let (sale_quantity, sale_value) = if s == UNSOLD {
                    ("NULL".to_string(), "NULL".to_string())
                } else {
                    ((rom - 1).to_string(), format!("{}.25", rom * 3))
                };
                rows.push(format!(
                    "({}, {}, {}, {}, {rom}, {}, {sale_quantity}, {sale_value})",
                    r + 1,
                    y + 1,
                    s + 1,
                    unit + 1,
                    half(rom),
                ));
            }
        }
        exec(
            &db,
            &format!(
                "INSERT INTO REGISTRO_PRODUCAO (id_sigla, id_ano, id_substancia, id_unidade_contido, \
                 quantidade_rom, quantidade_contido, quantidade_venda, valor_venda) VALUES {};",
                rows.join(", ")
            ),
        )
        .await;
    }

    db
}

fn half(n: usize) -> String {
    if n % 2 == 0 {
        (n / 2).to_string()
    } else {
        format!("{}.5", n / 2)
    }
}

fn insert_names(table: &str, columns: &str, names: &[&str]) -> String {
    let values: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("({}, '{name}')", i + 1))
        .collect();
    format!("INSERT INTO {table} ({columns}) VALUES {};", values.join(", "))
}

async fn exec(db: &DatabaseConnection, sql: &str) {
    db.execute_unprepared(sql)
        .await
        .unwrap_or_else(|e| panic!("fixture statement failed: {e}\n{sql}"));
}
