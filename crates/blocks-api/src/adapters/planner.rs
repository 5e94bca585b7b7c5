//! Stand-in compaction planner.
//!
//! There is no planning algorithm behind the planned view yet.
//! [`ExamplePlanner`] always proposes the same illustrative level-4 block so
//! the viewer has something to render. Swap it for a real [`Planner`] once
//! one exists.

use crate::ports::outbound::{PlanError, Planner};
use async_trait::async_trait;
use shared_types::{
    BlockCompaction, BlockId, BlockMeta, BlockStats, Downsample, ThanosMeta, META_VERSION_1,
};
use std::collections::BTreeMap;

const EXAMPLE_BLOCK: &str = "01EEB0ZRSQDJW51W11V4R6YP4T";
const EXAMPLE_SOURCES: [&str; 4] = [
    "01EDBMV5FNTZXBZETENC7ZXY99",
    "01EE3BKGP8WSJAH3M4Y6D7XQVB",
    "01EDW1T6FWT1PDSE85WAGBF848",
    "01EEB0QH11ANV2845HJNEP1M8J",
];

/// Planner that ignores its input and returns one fixed block.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExamplePlanner;

impl ExamplePlanner {
    fn example_block() -> Result<BlockMeta, PlanError> {
        let parse = |text: &str| {
            BlockId::from_string(text)
                .map_err(|e| PlanError::Failed(format!("example block id {text}: {e}")))
        };

        let sources = EXAMPLE_SOURCES
            .iter()
            .map(|text| parse(text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BlockMeta {
            ulid: parse(EXAMPLE_BLOCK)?,
            min_time: 1_594_629_445_222,
            max_time: 1_595_455_200_000,
            stats: BlockStats {
                num_samples: 1_189_126_896,
                num_series: 2_492,
                num_chunks: 10_093_065,
                num_tombstones: 0,
            },
            compaction: BlockCompaction {
                level: 4,
                sources,
                ..Default::default()
            },
            version: META_VERSION_1,
            thanos: ThanosMeta {
                version: 0,
                labels: BTreeMap::from([("monitor".to_string(), "prometheus_two".to_string())]),
                downsample: Downsample { resolution: 0 },
                source: "compactor".to_string(),
            },
        })
    }
}

#[async_trait]
impl Planner for ExamplePlanner {
    async fn plan(&self, _metas: &[BlockMeta]) -> Result<Vec<BlockMeta>, PlanError> {
        Ok(vec![Self::example_block()?])
    }
}
