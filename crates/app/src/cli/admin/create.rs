use clap::Args;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateAdminArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Admin display name
    #[arg(long)]
    name: String,
}

pub(crate) async fn run(args: CreateAdminArgs) -> Result<(), String> {
    let service = args.database.auth_service().await?;

    let (admin, issued) = service
        .create_admin(&args.name)
        .await
        .map_err(|error| format!("failed to create admin: {error}"))?;

    println!("admin_uuid: {}", admin.uuid);
    println!("admin_name: {}", admin.name);
    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
