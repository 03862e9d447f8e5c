use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProfileRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxJobRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxApplicationRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSavedRepo {
    pub pool: PgPool,
}
