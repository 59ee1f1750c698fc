use beacon_app::auth::AdminUuid;
use clap::Args;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Admin that should own the token
    #[arg(long)]
    admin_uuid: AdminUuid,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let service = args.database.auth_service().await?;

    let issued = service
        .issue_api_token(args.admin_uuid)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("admin_uuid: {}", issued.metadata.admin_uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
