//! Shared helpers for route tests: an in-memory dataset and request helpers.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use lavra_db::DimensionRepository;
use lavra_db::migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tower::ServiceExt;

use crate::AppState;

const FIXTURE_SQL: [&str; 6] = [
    "INSERT INTO UF (id_sigla, sigla_uf) VALUES (1, 'MG'), (2, 'SP');",
    "INSERT INTO ANO (id_ano, ano) VALUES (1, 2019), (2, 2020);",
    "INSERT INTO CLASSE_SUBSTANCIA (id_classe, nome_classe) VALUES (1, 'Metálicos'), (2, 'Não Metálicos');",
    "INSERT INTO SUBSTANCIA_MINERAL (id_substancia, nome_substancia, id_classe) VALUES (1, 'Ferro', 1), (2, 'Ouro', 1), (3, 'Calcário', 2);",
    "INSERT INTO UNIDADE_CONTIDO (id_unidade_contido, unidade) VALUES (1, 't'), (2, 'kg');",
    r"INSERT INTO REGISTRO_PRODUCAO
        (id_sigla, id_ano, id_substancia, id_unidade_contido, quantidade_rom, quantidade_contido, quantidade_venda, valor_venda)
    VALUES
        (1, 1, 1, 1, 100, 60, 90, 300.5),
        (1, 2, 1, 1, 150, 90, 140, 450),
        (1, 2, 2, 2, 2, 1.5, 2, 600),
        (2, 2, 3, 1, 80, NULL, 70, 40),
        (2, 1, 2, 2, 1, 0.75, 1, 290);",
];

/// Opens a seeded in-memory database.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    for sql in FIXTURE_SQL {
        db.execute_unprepared(sql).await.expect("Failed to seed");
    }
    db
}

/// Builds application state over [`test_db`].
pub async fn test_state() -> AppState {
    let db = test_db().await;
    let options = DimensionRepository::new(db.clone())
        .load_options()
        .await
        .expect("Failed to load options");
    AppState::new(db, options, None)
}

/// Sends a GET request and decodes the JSON body.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}
