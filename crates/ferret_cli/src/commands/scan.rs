//! Remote and repository-URL scanning over git history.

use anyhow::Context as _;
use ferret_core::{Repository, ScanStatus, Target, TargetKind};
use ferret_providers::{GitHubClient, GitLabClient, HostClient, Owner, OwnerKind};

use super::{ConfigOverrides, Result, build_session};
use crate::{Host, ScanArgs, orchestrator, output, ui};

pub(crate) fn run(args: &ScanArgs) -> Result {
    let overrides = ConfigOverrides {
        threads: args.threads,
        output: args.format.map(Into::into),
        hide_secrets: args.hide_secrets,
        scan_tests: args.scan_tests,
        match_level: args.match_level,
        silent: args.silent,
        rules: args.rules.clone(),
        clone_depth: args.clone_depth,
    };
    let session = build_session(args.config.as_deref(), &overrides)?;
    anyhow::ensure!(
        args.output.is_none() || session.config.output != ferret_core::OutputMode::Text,
        "--output requires --format json or csv"
    );

    session.set_status(ScanStatus::Gathering);
    if args.repo_url.is_empty() {
        anyhow::ensure!(
            !args.targets.is_empty(),
            "nothing to scan: pass target logins or --repo-url"
        );
        enumerate_targets(&session, args)?;
    } else {
        for (index, url) in args.repo_url.iter().enumerate() {
            session.add_repository(repository_from_url(index, url));
        }
    }

    let total = session.stats().repositories;
    if total == 0 {
        ui::print_info("no repositories to scan");
        return Ok(());
    }
    ui::print_info(&format!(
        "scanning {total} {}",
        ui::pluralise_word(total, "repository", "repositories")
    ));

    orchestrator::run(&session);
    output::print_results(&session, args.output.as_deref())?;

    if session.stats().findings_total > 0 {
        std::process::exit(ui::exit::FINDINGS);
    }
    Ok(())
}

/// Resolves target logins through the configured hosting service and
/// fills the session with their repositories.
fn enumerate_targets(session: &ferret_core::Session, args: &ScanArgs) -> Result {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let client = build_client(session, args.host)?;

    runtime.block_on(async {
        for login in &args.targets {
            let owner = client.get_user_organization(login).await?;
            session.add_target(target_from_owner(&owner));

            add_owner_repositories(session, client.as_ref(), &owner, args.include_forks).await?;

            if args.include_members && owner.kind == OwnerKind::Organization {
                for member in client.get_organization_members(&owner).await? {
                    session.add_target(target_from_owner(&member));
                    add_owner_repositories(session, client.as_ref(), &member, args.include_forks)
                        .await?;
                }
            }
        }
        Ok::<_, anyhow::Error>(())
    })?;

    Ok(())
}

async fn add_owner_repositories(
    session: &ferret_core::Session,
    client: &dyn HostClient,
    owner: &Owner,
    include_forks: bool,
) -> Result {
    for repo in client.get_repositories_from_owner(owner).await? {
        if repo.fork && !include_forks {
            continue;
        }
        session.add_repository(Repository {
            id: repo.id,
            owner: repo.owner,
            name: repo.name,
            clone_url: repo.clone_url,
            default_branch: repo.default_branch,
        });
    }
    Ok(())
}

/// Builds the enumeration client for the selected host. Token shape is
/// validated during construction; a malformed token aborts the scan.
fn build_client(session: &ferret_core::Session, host: Host) -> Result<Box<dyn HostClient>> {
    let config = &session.config;
    match host {
        Host::Github => {
            let token = config
                .github_access_token
                .clone()
                .or_else(|| std::env::var("FERRET_GITHUB_TOKEN").ok());
            Ok(Box::new(GitHubClient::new(token.as_deref())?))
        }
        Host::Gitlab => {
            let token = config
                .gitlab_access_token
                .clone()
                .or_else(|| std::env::var("FERRET_GITLAB_TOKEN").ok());
            Ok(Box::new(GitLabClient::new(token.as_deref())?))
        }
    }
}

fn target_from_owner(owner: &Owner) -> Target {
    Target {
        id: owner.id,
        login: owner.login.clone(),
        kind: match owner.kind {
            OwnerKind::User => TargetKind::User,
            OwnerKind::Organization => TargetKind::Organization,
        },
    }
}

/// Builds a repository descriptor for a directly supplied clone URL or
/// local path. Owner and name are derived from the last two path
/// segments.
fn repository_from_url(index: usize, url: &str) -> Repository {
    let trimmed = url.trim_end_matches('/').trim_end_matches(".git");
    let mut segments = trimmed.rsplit(['/', ':']).filter(|s| !s.is_empty());
    let name = segments.next().unwrap_or("repository").to_string();
    let owner = segments.next().unwrap_or("local").to_string();

    Repository {
        id: i64::try_from(index).unwrap_or(i64::MAX) + 1,
        owner,
        name,
        clone_url: url.to_string(),
        default_branch: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::repository_from_url;

    #[test]
    fn repository_from_url_splits_owner_and_name() {
        let repo = repository_from_url(0, "https://github.com/acme/widget.git");
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "widget");
        assert_eq!(repo.clone_url, "https://github.com/acme/widget.git");
    }

    #[test]
    fn repository_from_url_handles_local_paths() {
        let repo = repository_from_url(2, "/tmp/fixtures/sample");
        assert_eq!(repo.owner, "fixtures");
        assert_eq!(repo.name, "sample");
        assert_eq!(repo.id, 3);
    }
}
