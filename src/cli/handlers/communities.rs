//! CLI handler for listing detected communities.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{format_count, format_vec3, output_json_list, print_table, OutputMode};
use crate::models::CommunityGraph;
use crate::utils::math::Vec3;

#[derive(Debug, Serialize)]
struct CommunityRow {
    community_id: usize,
    member_count: usize,
    reach_sum: f64,
    retweet_sum: f64,
    likes_sum: f64,
    centroid: Vec3,
    connections: Vec<usize>,
    members: Vec<String>,
}

pub fn handle_communities(
    input: &Path,
    config: Option<&Path>,
    limit: usize,
    mode: OutputMode,
) -> Result<()> {
    let config = super::resolve_config(config)?;
    let result = super::run_pipeline(input, config)?;

    let rows = ranked_rows(
        &result.communities,
        |i| result.graph.nodes()[i].location_id.clone(),
        limit,
    );

    if mode == OutputMode::Json {
        output_json_list(&rows);
        return Ok(());
    }

    println!(
        "{} communities across {} locations (modularity {:.4})",
        result.communities.nodes.len(),
        result.graph.node_count(),
        result.modularity
    );
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.community_id.to_string(),
                r.member_count.to_string(),
                format_count(r.reach_sum),
                format_count(r.retweet_sum),
                format_count(r.likes_sum),
                format_vec3(&r.centroid),
                r.connections
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect();
    print_table(
        &[
            "ID",
            "Members",
            "Reach",
            "Retweets",
            "Likes",
            "Centroid",
            "Connections",
        ],
        table,
    );

    Ok(())
}

/// Communities ordered largest first, ties by id.
fn ranked_rows(
    graph: &CommunityGraph,
    location_id: impl Fn(usize) -> String,
    limit: usize,
) -> Vec<CommunityRow> {
    let mut nodes: Vec<_> = graph.nodes.iter().collect();
    nodes.sort_by(|a, b| {
        b.member_count
            .cmp(&a.member_count)
            .then(a.community_id.cmp(&b.community_id))
    });
    nodes
        .into_iter()
        .take(limit)
        .map(|c| CommunityRow {
            community_id: c.community_id,
            member_count: c.member_count,
            reach_sum: c.reach_sum,
            retweet_sum: c.retweet_sum,
            likes_sum: c.likes_sum,
            centroid: c.centroid,
            connections: graph.connections(c.community_id),
            members: c.members.iter().map(|&i| location_id(i)).collect(),
        })
        .collect()
}
