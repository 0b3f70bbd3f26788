//! Post-generation sanity check of every platform transition against the
//! discrete jump arc. Suspect transitions are logged, never rejected.

use serde::{Deserialize, Serialize};

use crate::level_gen::LevelLayout;
use crate::physics::{ControllerConfig, MotionParams};

/// A transition the player may be unable to make.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachabilityIssue {
    /// Index of the platform being jumped to.
    pub target: usize,
    /// Horizontal gap between the two platforms.
    pub gap: f32,
    /// How much higher the target is (negative when lower).
    pub rise: f32,
    /// Best height gain available once the gap is covered.
    pub reachable: f32,
}

/// Height gained `n` ticks after a jump with the controller's integration order.
pub fn jump_rise(motion: &MotionParams, n: u32) -> f32 {
    let n = n as f32;
    n * motion.jump_strength - motion.gravity * n * (n + 1.0) / 2.0
}

/// Highest point of the discrete jump arc.
pub fn jump_peak(motion: &MotionParams) -> f32 {
    let apex_tick = (motion.jump_strength / motion.gravity).floor().max(0.0) as u32;
    jump_rise(motion, apex_tick)
}

/// Check each consecutive pair of platforms in `layout`.
pub fn audit(
    layout: &LevelLayout,
    motion: &MotionParams,
    cfg: &ControllerConfig,
) -> Vec<ReachabilityIssue> {
    let speed = cfg.sprint_speed();
    let apex_tick = (motion.jump_strength / motion.gravity).floor().max(0.0) as u32;
    let peak = jump_peak(motion);

    let mut issues = Vec::new();
    for (i, pair) in layout.platforms.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let gap = to.left() - from.right();
        let rise = from.top() - to.top();
        let travel = (gap - cfg.player_width).max(0.0);
        let ticks = (travel / speed).ceil() as u32;

        let arc = if ticks <= apex_tick {
            peak
        } else {
            jump_rise(motion, ticks)
        };
        let headroom = from.top() - layout.corridor.ceiling_y - cfg.player_height;
        let reachable = arc.min(headroom);

        if reachable < rise {
            let issue = ReachabilityIssue {
                target: i + 1,
                gap,
                rise,
                reachable,
            };
            tracing::warn!(
                seed = layout.seed,
                target = issue.target,
                gap,
                rise,
                reachable,
                "Platform transition may be out of jump range"
            );
            issues.push(issue);
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use mups_core::Rect;

    use super::*;
    use crate::level_gen::{CorridorBounds, generate};
    use crate::profile::sample_profile;

    const MOTION: MotionParams = MotionParams {
        gravity: 0.6,
        jump_strength: 9.0,
        wall_jump: false,
    };

    fn layout_with(platforms: Vec<Rect>) -> LevelLayout {
        let mut layout = generate(
            &sample_profile(),
            CorridorBounds {
                ceiling_y: 80.0,
                floor_y: 520.0,
            },
            4000.0,
            0,
        )
        .unwrap();
        layout.platforms = platforms;
        layout
    }

    #[test]
    fn discrete_peak_is_below_continuous_apex() {
        // 15 ticks up: 15*9 - 0.6*15*16/2 = 63, under the 67.5 closed form.
        assert!((jump_peak(&MOTION) - 63.0).abs() < 1e-4);
        assert!(jump_peak(&MOTION) < sample_profile().apex_height());
    }

    #[test]
    fn generated_hub_tuning_layouts_are_reachable() {
        let cfg = ControllerConfig::default();
        for seed in 0..30 {
            let layout = generate(
                &sample_profile(),
                CorridorBounds {
                    ceiling_y: 80.0,
                    floor_y: 520.0,
                },
                4000.0,
                seed,
            )
            .unwrap();
            let issues = audit(&layout, &MOTION, &cfg);
            assert!(issues.is_empty(), "seed {seed}: {issues:?}");
        }
    }

    #[test]
    fn flags_wide_gap() {
        let layout = layout_with(vec![
            Rect::new(0.0, 400.0, 200.0, 18.0),
            Rect::new(600.0, 400.0, 200.0, 18.0),
        ]);
        let issues = audit(&layout, &MOTION, &ControllerConfig::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].target, 1);
        assert_eq!(issues[0].gap, 400.0);
    }

    #[test]
    fn flags_tall_step() {
        let layout = layout_with(vec![
            Rect::new(0.0, 400.0, 200.0, 18.0),
            Rect::new(260.0, 300.0, 200.0, 18.0),
        ]);
        let issues = audit(&layout, &MOTION, &ControllerConfig::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rise, 100.0);
    }

    #[test]
    fn low_ceiling_limits_reach() {
        let mut layout = layout_with(vec![
            Rect::new(0.0, 200.0, 200.0, 18.0),
            Rect::new(260.0, 160.0, 200.0, 18.0),
        ]);
        layout.corridor.ceiling_y = 150.0;
        let issues = audit(&layout, &MOTION, &ControllerConfig::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].reachable, 20.0);
    }

    #[test]
    fn drop_down_is_fine() {
        let layout = layout_with(vec![
            Rect::new(0.0, 200.0, 200.0, 18.0),
            Rect::new(280.0, 400.0, 200.0, 18.0),
        ]);
        assert!(audit(&layout, &MOTION, &ControllerConfig::default()).is_empty());
    }
}
