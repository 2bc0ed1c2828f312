use sqlx::PgPool;

/// テスト用データベースプールを作成し、マイグレーションを実行
///
/// DATABASE_URL環境変数が未設定の場合は`None`を返し、
/// 呼び出し側のテストはスキップされる。
/// 本番と同じマイグレーションファイルを使用する。
pub async fn create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL is not set, skipping PostgreSQL test");
        return None;
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}
