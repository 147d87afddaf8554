//! cli::commands::clone
//!
//! Create a repository from a template, clone it, and apply parameters.
//!
//! # Design
//!
//! All flags are validated first: repository options (at most one
//! visibility), delimiters, and language. Then a token must exist for the
//! target host. Only then is `gh repo create` run.
//!
//! # Example
//!
//! ```bash
//! gh template clone my-app --template octo/rust-template --private -p project=my-app
//! ```

use anyhow::Result;

use super::{block_on, renderer, run_configuration};
use crate::auth::{default_host, ensure_authenticated};
use crate::cli::args::CloneArgs;
use crate::core::config::{RepoOptions, RunConfiguration};
use crate::engine::{Context, GitLocalRepository, Orchestrator};
use crate::forge::{create_forge, create_token_provider, CreateRepoRequest};

/// Run the clone command.
pub fn clone(ctx: &Context, args: &CloneArgs) -> Result<()> {
    let options = repo_options(args)?;
    let config = run_configuration(&args.apply, ctx.verbose)?;

    let request = CreateRepoRequest {
        name: args.name.clone(),
        template: args.template.clone(),
        options,
        workdir: ctx.working_dir().to_path_buf(),
    };
    let host = match &ctx.repo {
        Some(_) => ctx.repository()?.host,
        None => default_host(),
    };

    block_on(clone_async(&host, &request, &config, &args.apply.params))?
}

fn repo_options(args: &CloneArgs) -> Result<RepoOptions> {
    let mut builder = RepoOptions::builder()
        .disable_issues(args.disable_issues)
        .disable_wiki(args.disable_wiki)
        .include_all_branches(args.include_all_branches)
        .internal(args.internal)
        .private(args.private)
        .public(args.public);
    if let Some(description) = &args.description {
        builder = builder.description(description.as_str());
    }
    if let Some(remote) = &args.remote {
        builder = builder.remote(remote.as_str());
    }
    if let Some(homepage) = &args.homepage {
        builder = builder.homepage(homepage.as_str());
    }
    if let Some(team) = &args.team {
        builder = builder.team(team.as_str());
    }
    Ok(builder.build()?)
}

async fn clone_async(
    host: &str,
    request: &CreateRepoRequest,
    config: &RunConfiguration,
    params: &[(String, String)],
) -> Result<()> {
    let provider = create_token_provider(host);
    ensure_authenticated(provider.as_ref()).await?;

    let forge = create_forge(provider);
    let local = GitLocalRepository;
    let renderer = renderer();

    eprintln!("Creating repository {}", request.name);
    let outcome = Orchestrator::new(forge.as_ref(), &local, &renderer)
        .clone_and_apply(request, config, params)
        .await?;

    for path in &outcome.report.rendered {
        tracing::info!(path = %path.display(), "formatted");
    }
    tracing::debug!(root = %outcome.root.display(), phase = %outcome.phase, "clone complete");
    Ok(())
}
