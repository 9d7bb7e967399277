//! Mineral production schema.
//!
//! Four dimensions (UF, ANO, SUBSTANCIA_MINERAL with its CLASSE_SUBSTANCIA),
//! the measurement unit table and the REGISTRO_PRODUCAO fact table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        // SQLite executes one statement per call.
        for statement in SCHEMA_SQL {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in [
            "REGISTRO_PRODUCAO",
            "UNIDADE_CONTIDO",
            "SUBSTANCIA_MINERAL",
            "CLASSE_SUBSTANCIA",
            "ANO",
            "UF",
        ] {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {table};"))
                .await?;
        }
        Ok(())
    }
}

const SCHEMA_SQL: [&str; 11] = [
    r"
CREATE TABLE IF NOT EXISTS UF (
    id_sigla INTEGER PRIMARY KEY,
    sigla_uf TEXT NOT NULL UNIQUE
);",
    r"
CREATE TABLE IF NOT EXISTS ANO (
    id_ano INTEGER PRIMARY KEY,
    ano INTEGER NOT NULL UNIQUE
);",
    r"
CREATE TABLE IF NOT EXISTS CLASSE_SUBSTANCIA (
    id_classe INTEGER PRIMARY KEY,
    nome_classe TEXT NOT NULL UNIQUE
);",
    r"
CREATE TABLE IF NOT EXISTS SUBSTANCIA_MINERAL (
    id_substancia INTEGER PRIMARY KEY,
    nome_substancia TEXT NOT NULL,
    id_classe INTEGER NOT NULL REFERENCES CLASSE_SUBSTANCIA(id_classe),
    UNIQUE (id_classe, nome_substancia)
);",
    r"
CREATE TABLE IF NOT EXISTS UNIDADE_CONTIDO (
    id_unidade_contido INTEGER PRIMARY KEY,
    unidade TEXT NOT NULL UNIQUE
);",
    r"
CREATE TABLE IF NOT EXISTS REGISTRO_PRODUCAO (
    id_registro INTEGER PRIMARY KEY,
    id_sigla INTEGER NOT NULL REFERENCES UF(id_sigla),
    id_ano INTEGER NOT NULL REFERENCES ANO(id_ano),
    id_substancia INTEGER NOT NULL REFERENCES SUBSTANCIA_MINERAL(id_substancia),
    id_unidade_contido INTEGER NOT NULL REFERENCES UNIDADE_CONTIDO(id_unidade_contido),
    quantidade_rom REAL,
    quantidade_contido REAL,
    quantidade_venda REAL,
    valor_venda REAL,
    UNIQUE (id_sigla, id_ano, id_substancia, id_unidade_contido)
);",
    "CREATE INDEX IF NOT EXISTS idx_registro_sigla ON REGISTRO_PRODUCAO(id_sigla);",
    "CREATE INDEX IF NOT EXISTS idx_registro_ano ON REGISTRO_PRODUCAO(id_ano);",
    "CREATE INDEX IF NOT EXISTS idx_registro_substancia ON REGISTRO_PRODUCAO(id_substancia);",
    "CREATE INDEX IF NOT EXISTS idx_registro_unidade ON REGISTRO_PRODUCAO(id_unidade_contido);",
    "CREATE INDEX IF NOT EXISTS idx_substancia_classe ON SUBSTANCIA_MINERAL(id_classe);",
];
