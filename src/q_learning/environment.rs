//! Simulated game environment for model-free learning
//!
//! Wraps the MDP's reward structure but samples a single opponent reply per
//! step instead of enumerating the full distribution.

use rand::rngs::StdRng;

use crate::{
    Error, Result,
    mdp::{Outcome, TicTacToeMdp},
    opponent::{Opponent, UniformOpponent},
    tictactoe::{BoardState, Move, Player},
    utils::build_rng,
};

#[derive(Debug, Clone)]
pub struct Environment<O = UniformOpponent> {
    mdp: TicTacToeMdp<O>,
    state: BoardState,
    rng: StdRng,
}

impl<O: Opponent> Environment<O> {
    /// Create an environment positioned at the start of a game
    pub fn new(mdp: TicTacToeMdp<O>, seed: Option<u64>) -> Result<Self> {
        let mut env = Self {
            mdp,
            state: BoardState::new(),
            rng: build_rng(seed),
        };
        env.reset()?;
        Ok(env)
    }

    /// Start a new game. When the agent plays O the opponent opens, so the
    /// returned state is always one where the agent is to move.
    pub fn reset(&mut self) -> Result<BoardState> {
        let empty = BoardState::new();
        self.state = if self.mdp.agent() == Player::O {
            let opening = self.mdp.opponent().choose_reply(&empty, &mut self.rng)?;
            empty.apply(opening)?
        } else {
            empty
        };
        Ok(self.state)
    }

    pub fn current_state(&self) -> BoardState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Play the agent's `action`, then a sampled opponent reply if the game
    /// goes on. Rewards follow the MDP: a game-ending agent move earns the
    /// terminal reward, anything else the living reward plus the terminal
    /// bonus of the reply.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalAction`] or [`Error::TerminalState`]; the
    /// environment's state is left unchanged on error.
    pub fn step(&mut self, action: Move) -> Result<Outcome> {
        let source = self.state;
        if source.is_terminal() {
            return Err(Error::TerminalState {
                state: source.encode(),
            });
        }
        let agent = self.mdp.agent();
        let after = source.apply(action)?;

        let status = after.evaluate_outcome(agent);
        let (reward, next) = if status.is_terminal() {
            (self.mdp.rewards().terminal_reward(status), after)
        } else {
            let reply = self.mdp.opponent().choose_reply(&after, &mut self.rng)?;
            let next = after.apply(reply)?;
            (self.mdp.rewards().reply_reward(next.evaluate_outcome(agent)), next)
        };

        self.state = next;
        Ok(Outcome {
            source,
            action,
            reward,
            next,
        })
    }

    pub fn mdp(&self) -> &TicTacToeMdp<O> {
        &self.mdp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::MdpConfig, opponent::FirstLegalOpponent, tictactoe::GameStatus};

    fn deterministic(agent: Player) -> Environment<FirstLegalOpponent> {
        let mdp = TicTacToeMdp::with_opponent(MdpConfig::new(agent), FirstLegalOpponent);
        Environment::new(mdp, Some(0)).unwrap()
    }

    #[test]
    fn test_reset_as_x_starts_empty() {
        let env = deterministic(Player::X);
        assert_eq!(env.current_state(), BoardState::new());
    }

    #[test]
    fn test_reset_as_o_lets_opponent_open() {
        let env = deterministic(Player::O);
        let state = env.current_state();
        assert_eq!(state.occupied_count(), 1);
        assert_eq!(state.to_move, Player::O);
    }

    #[test]
    fn test_step_plays_agent_and_reply() {
        let mut env = deterministic(Player::X);
        let outcome = env.step(Move::new(4, Player::X)).unwrap();
        assert_eq!(outcome.source, BoardState::new());
        assert_eq!(outcome.reward, 0.0);
        assert_eq!(outcome.next.occupied_count(), 2);
        assert_eq!(outcome.next, BoardState::from_string("O...X...._X").unwrap());
        assert_eq!(env.current_state(), outcome.next);
    }

    #[test]
    fn test_illegal_step_leaves_state_unchanged() {
        let mut env = deterministic(Player::X);
        env.step(Move::new(4, Player::X)).unwrap();
        let before = env.current_state();
        assert!(matches!(
            env.step(Move::new(4, Player::X)),
            Err(Error::IllegalAction { position: 4, .. })
        ));
        assert_eq!(env.current_state(), before);
    }

    #[test]
    fn test_full_game_ends_with_terminal_reward() {
        // X plays the first empty cell too: X0 O1 X2 O3 X4 O5 X6 wins on 2-4-6
        let mut env = deterministic(Player::X);
        let mut last = None;
        while !env.is_terminal() {
            let action = env.current_state().legal_actions()[0];
            last = Some(env.step(action).unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.next.evaluate_outcome(Player::X), GameStatus::Win);
        assert_eq!(last.reward, 1.0);
        assert!(matches!(
            env.step(Move::new(8, Player::X)),
            Err(Error::TerminalState { .. })
        ));
        assert_eq!(env.reset().unwrap(), BoardState::new());
    }
}
