mod cli;
mod infra;
mod routes;
mod server;

use credit_card::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
