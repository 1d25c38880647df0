use super::args::{Cli, Commands};
use super::handlers;
use crate::context::ExecutionContext;
use crate::handlers::put_params::PutOptions;
use crate::logging;
use crate::prompt::{self, Prompter};
use anyhow::Result;
use clap::CommandFactory;
use paramsync_runtime::AwsConfig;
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;

/// One command per invocation, so a single-threaded runtime is enough.
fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = ExecutionContext::new(
        cli.config,
        AwsConfig {
            region: cli.region,
            profile: cli.profile,
            endpoint_url: cli.endpoint_url,
        },
    );
    let mut prompter = Prompter::detect();

    match command {
        Commands::RemapKeysInEnv {
            outfile,
            oldprefix,
            newprefix,
        } => {
            let outfile = prompter.resolve(outfile, &prompt::OUTFILE)?;
            let old_prefix = prompter.resolve(oldprefix, &prompt::OLD_PREFIX)?;
            let new_prefix = prompter.resolve(newprefix, &prompt::NEW_PREFIX)?;
            debug!(%outfile, %old_prefix, %new_prefix, "remapKeysInEnv");

            handlers::remap::handle(&PathBuf::from(outfile), &old_prefix, &new_prefix)
        }

        Commands::SaveParamsFile {
            outfile,
            env,
            service,
        } => {
            let outfile = prompter.resolve(outfile, &prompt::OUTFILE)?;
            let env = prompter.resolve(env, &prompt::ENV)?;
            let service = prompter.resolve(service, &prompt::SERVICE)?;
            debug!(%outfile, %env, %service, "saveParamsFile");

            block_on(handlers::save_params::handle(
                &ctx,
                &env,
                &service,
                &PathBuf::from(outfile),
            ))
        }

        Commands::PutToAwsFromFile {
            infile,
            env,
            service,
            overwrite,
            encrypt,
        } => {
            let infile = prompter.resolve(infile, &prompt::INFILE)?;
            let env = prompter.resolve(env, &prompt::ENV)?;
            let service = prompter.resolve(service, &prompt::SERVICE)?;
            debug!(%infile, %env, %service, overwrite, encrypt, "putToAWSFromFile");

            block_on(handlers::put_params::handle(
                &ctx,
                &PathBuf::from(infile),
                &env,
                &service,
                PutOptions { overwrite, encrypt },
            ))
        }

        Commands::ExportAllParams { folder, no_decrypt } => {
            let folder = prompter.resolve(folder, &prompt::FOLDER)?;
            debug!(%folder, no_decrypt, "exportAllParams");

            block_on(handlers::export::handle(
                &ctx,
                &PathBuf::from(folder),
                !no_decrypt,
            ))
        }

        Commands::GetSharedConfigByService {
            outfile,
            env,
            service,
        } => {
            let outfile = prompter.resolve(outfile, &prompt::SHARED_OUTFILE)?;
            let env = prompter.resolve(env, &prompt::ENV)?;
            let service = prompter.resolve(service, &prompt::SERVICE)?;

            block_on(handlers::shared_config::handle_get(
                &ctx,
                &env,
                &service,
                &PathBuf::from(outfile),
            ))
        }

        Commands::PutSharedConfigFromFile {
            infile,
            env,
            service,
        } => {
            let infile = prompter.resolve(infile, &prompt::SHARED_INFILE)?;
            let env = prompter.resolve(env, &prompt::ENV)?;
            let service = prompter.resolve(service, &prompt::SERVICE)?;

            block_on(handlers::shared_config::handle_put(
                &ctx,
                &PathBuf::from(infile),
                &env,
                &service,
            ))
        }

        Commands::GetParameter {
            env,
            service,
            name,
            no_decrypt,
        } => {
            let env = prompter.resolve(env, &prompt::ENV)?;
            let service = prompter.resolve(service, &prompt::SERVICE)?;
            let name = prompter.resolve(name, &prompt::NAME)?;

            block_on(handlers::inspect::handle_get_parameter(
                &ctx,
                &env,
                &service,
                &name,
                !no_decrypt,
            ))
        }

        Commands::ListEnvironments => block_on(handlers::inspect::handle_list_environments(&ctx)),

        Commands::ListServices { env } => {
            let env = prompter.resolve(env, &prompt::ENV)?;
            block_on(handlers::inspect::handle_list_services(&ctx, &env))
        }
    }
}
