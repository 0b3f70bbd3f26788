use std::time::Duration;

use crate::input::PlayerInput;
use crate::session::GameEvent;
use crate::shop::ShopItem;

use super::{GameState, SceneContext, SceneHandler};

fn dismissed(input: &PlayerInput) -> bool {
    input.confirm || input.interact || input.back
}

/// Mission complete summary.
pub(super) struct WinScene;

impl SceneHandler for WinScene {
    fn on_tick(
        &self,
        _ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        _dt: Duration,
    ) -> Option<GameState> {
        dismissed(input).then_some(GameState::Hub)
    }
}

/// Out of lives summary.
pub(super) struct GameOverScene;

impl SceneHandler for GameOverScene {
    fn on_tick(
        &self,
        _ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        _dt: Duration,
    ) -> Option<GameState> {
        dismissed(input).then_some(GameState::Hub)
    }
}

/// Shop counter. Confirm or interact buys the highlighted item.
pub(super) struct ShopScene;

impl ShopScene {
    fn buy(ctx: &mut SceneContext<'_>) {
        let Some(&item) = ShopItem::ALL.get(ctx.state.shop_selection) else {
            return;
        };
        match ctx.state.upgrades.purchase(item, &mut *ctx.progression) {
            Ok(()) => {
                let credits_left = ctx.progression.credits();
                tracing::info!(item = item.key(), credits_left, "Upgrade purchased");
                ctx.events.push(GameEvent::ItemPurchased { item, credits_left });
            },
            Err(e) => {
                tracing::debug!(item = item.key(), "Purchase refused: {e}");
                ctx.events.push(GameEvent::PurchaseRefused {
                    item,
                    reason: e.to_string(),
                });
            },
        }
    }
}

impl SceneHandler for ShopScene {
    fn on_tick(
        &self,
        ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        _dt: Duration,
    ) -> Option<GameState> {
        if input.back {
            return Some(GameState::Hub);
        }
        let count = ShopItem::ALL.len();
        let selected = &mut ctx.state.shop_selection;
        if input.menu_up {
            *selected = (*selected + count - 1) % count;
        }
        if input.menu_down {
            *selected = (*selected + 1) % count;
        }
        if input.confirm || input.interact {
            Self::buy(ctx);
        }
        None
    }
}

/// Dimension lore viewer opened from the console.
pub(super) struct CodexScene;

impl SceneHandler for CodexScene {
    fn on_tick(
        &self,
        _ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        _dt: Duration,
    ) -> Option<GameState> {
        (dismissed(input) || input.codex).then_some(GameState::Hub)
    }
}

/// Conversation with a hub NPC, one line per confirm.
pub(super) struct DialogScene;

impl DialogScene {
    fn emit_line(ctx: &mut SceneContext<'_>) -> bool {
        let Some(cursor) = ctx.state.dialog else {
            return false;
        };
        let Some(npc) = ctx.hub.npcs.get(cursor.npc) else {
            return false;
        };
        let Some(line) = npc.lines.get(cursor.line) else {
            return false;
        };
        ctx.events.push(GameEvent::DialogLine {
            npc: npc.name.clone(),
            line: line.clone(),
        });
        true
    }
}

impl SceneHandler for DialogScene {
    fn on_enter(&self, ctx: &mut SceneContext<'_>, _from: Option<GameState>) -> Option<GameState> {
        if Self::emit_line(ctx) {
            None
        } else {
            Some(GameState::Hub)
        }
    }

    fn on_tick(
        &self,
        ctx: &mut SceneContext<'_>,
        input: &PlayerInput,
        _dt: Duration,
    ) -> Option<GameState> {
        if input.back {
            return Some(GameState::Hub);
        }
        if !(input.confirm || input.interact) {
            return None;
        }
        if let Some(cursor) = ctx.state.dialog.as_mut() {
            cursor.line += 1;
        }
        if Self::emit_line(ctx) {
            None
        } else {
            Some(GameState::Hub)
        }
    }

    fn on_exit(&self, ctx: &mut SceneContext<'_>) {
        ctx.state.dialog = None;
    }
}
