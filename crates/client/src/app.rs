//! Composition root: content, runtime and console observers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use battle_content::ContentFactory;
use battle_core::RunResult;
use battle_runtime::{Event, RunEvent, RunHandle, RunOrchestrator, Topic, TracingSink};

use crate::config::ClientConfig;

/// Loads content, runs the configured plan to the end and returns its result.
///
/// Ctrl-C cancels the run.
pub async fn run(config: &ClientConfig) -> Result<RunResult> {
    let factory = ContentFactory::new(&config.content_dir);
    let tables = factory.load_tables()?;
    let catalog = factory.load_monsters()?;
    let profile = factory.load_player()?;
    let definition = factory
        .load_plan(&config.plan)
        .with_context(|| format!("Unknown plan '{}'", config.plan))?;

    tracing::info!(
        plan = %definition.plan.id(),
        kind = definition.plan.kind(),
        monsters = catalog.len(),
        player = %profile.name,
        "Content loaded"
    );

    let run = RunOrchestrator::builder()
        .config(config.runtime_config(tables.cadence))
        .tables(tables.combat)
        .catalog(Arc::new(catalog))
        .objectives(definition.objectives())
        .plan(definition.plan)
        .player(profile.to_combatant())
        .result_sink(Arc::new(TracingSink))
        .build()?;

    let handle = run.handle();
    let narrator = narrate(&handle);
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted; cancelling run");
            handle.cancel();
        }
    });

    let result = run.join().await?;
    interrupt.abort();
    if let Err(error) = narrator.await {
        tracing::warn!("Narrator task failed: {}", error);
    }

    Ok(result)
}

/// Mirrors the battle log and run lifecycle to the console.
fn narrate(handle: &RunHandle) -> JoinHandle<()> {
    let mut topics = handle.subscribe_multiple(&[Topic::Log, Topic::Run]).into_iter();
    let (Some((_, mut log)), Some((_, mut run))) = (topics.next(), topics.next()) else {
        return tokio::spawn(async {});
    };

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                event = log.recv() => match event {
                    Ok(Event::Log(entry)) => {
                        tracing::info!(target: "battle::log", tick = entry.tick, kind = %entry.kind, "{}", entry.message);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "Console fell behind the battle log"),
                    Err(RecvError::Closed) => break,
                },
                event = run.recv() => match event {
                    Ok(Event::Run(RunEvent::EncounterStarted { label, enemies, .. })) => {
                        tracing::info!("{} begins: {}", label, enemies.join(", "));
                    }
                    Ok(Event::Run(RunEvent::EncounterFinished { index, outcome })) => {
                        tracing::info!(encounter = index + 1, %outcome, "Encounter finished");
                    }
                    Ok(Event::Run(RunEvent::Completed(result))) => {
                        while let Ok(Event::Log(entry)) = log.try_recv() {
                            tracing::info!(target: "battle::log", tick = entry.tick, kind = %entry.kind, "{}", entry.message);
                        }
                        summarize(&result);
                        break;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "Console fell behind run events"),
                    Err(RecvError::Closed) => break,
                },
            }
        }
    })
}

fn summarize(result: &RunResult) {
    let stats = &result.statistics;
    tracing::info!(
        plan = %result.plan,
        success = result.success,
        encounters = result.encounters,
        monsters = stats.monsters_defeated,
        bosses = stats.bosses_defeated,
        damage_dealt = stats.damage_dealt,
        damage_taken = stats.damage_taken,
        gold = stats.gold_obtained,
        items = stats.items_obtained.len(),
        "Run finished: {:?}",
        result.end
    );
    for objective in &result.objectives {
        tracing::info!(
            "Objective {:?}: {}/{}{}",
            objective.kind,
            objective.current,
            objective.target,
            if objective.completed { " (complete)" } else { "" }
        );
    }
}
