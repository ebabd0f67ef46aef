//! One-shot command line versions of the HTTP operations.

use anyhow::{bail, Context, Result};

use repopick_core::{
    build_tree, bundle, list_branches, RootResolver, SettingsManager, UpdateOrchestrator,
};

pub async fn tree(settings: SettingsManager) -> Result<()> {
    let root = RootResolver::new(settings).resolve().await?;
    let tree = tokio::task::spawn_blocking(move || build_tree(&root)).await?;
    let json = serde_json::to_string_pretty(&tree).context("Failed to serialize tree")?;
    println!("{json}");
    Ok(())
}

pub async fn branches(settings: SettingsManager) -> Result<()> {
    let root = RootResolver::new(settings.clone()).resolve().await?;
    let repo = &settings.settings().repo;
    for branch in list_branches(&root, &repo.branch, &repo.remote).await {
        println!("{branch}");
    }
    Ok(())
}

pub async fn read(settings: SettingsManager, paths: &[String]) -> Result<()> {
    let root = RootResolver::new(settings).resolve().await?;
    print!("{}", bundle(&root, paths).await?);
    Ok(())
}

pub async fn update(settings: SettingsManager, branch: Option<String>) -> Result<()> {
    let root = RootResolver::new(settings.clone()).resolve().await?;
    let branch = branch.unwrap_or_else(|| settings.settings().repo.branch.clone());

    match UpdateOrchestrator::new(settings).update(&root, &branch).await {
        Ok(log) => {
            println!("{log}");
            Ok(())
        }
        Err(failure) => {
            println!("{}", failure.log);
            bail!(failure.error)
        }
    }
}
