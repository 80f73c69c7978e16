//! Q-learning agent
//!
//! Learns Q* by playing episodes in the simulated environment, updating
//! toward the best next-state value regardless of the action actually taken
//! next.

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::{MdpConfig, QLearningConfig},
    mdp::TicTacToeMdp,
    opponent::{Opponent, UniformOpponent},
    policy::Policy,
    ports::{NoopObserver, Solver, TrainingObserver},
    q_learning::{environment::Environment, q_table::QTable},
    tictactoe::{BoardState, GameStatus, Move, StateSpace},
    utils::{build_rng, derive_seed},
};

/// Seed streams derived from the configured seed
const EXPLORATION_STREAM: u64 = 1;
const ENVIRONMENT_STREAM: u64 = 2;

/// Tallies of a training run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QLearningStats {
    pub episodes: usize,
    /// Q-value updates, one per agent move
    pub updates: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl QLearningStats {
    fn record(&mut self, status: GameStatus) {
        self.episodes += 1;
        match status {
            GameStatus::Win => self.wins += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::Loss => self.losses += 1,
            GameStatus::Ongoing => {}
        }
    }
}

/// Q-learning agent (off-policy TD control)
#[derive(Debug, Clone)]
pub struct QLearningAgent<O = UniformOpponent> {
    q_table: QTable,
    config: QLearningConfig,
    env: Environment<O>,
    space: StateSpace,
    rng: StdRng,
    stats: QLearningStats,
    policy: Option<Policy>,
}

impl QLearningAgent<UniformOpponent> {
    /// Agent trained against a uniformly random opponent
    pub fn new(mdp: MdpConfig, config: QLearningConfig) -> Result<Self> {
        Self::with_mdp(TicTacToeMdp::new(mdp), config)
    }
}

impl<O: Opponent> QLearningAgent<O> {
    /// Build the agent with a zeroed Q-table over the full state space.
    ///
    /// The configured seed drives both exploration and the environment's
    /// opponent, through independent derived streams.
    pub fn with_mdp(mdp: TicTacToeMdp<O>, config: QLearningConfig) -> Result<Self> {
        mdp.config().validate()?;
        config.validate()?;

        let space = StateSpace::enumerate(mdp.agent());
        let q_table = QTable::new(config.alpha, mdp.discount());
        let env = Environment::new(mdp, derive_seed(config.seed, ENVIRONMENT_STREAM))?;

        let mut agent = Self {
            q_table,
            rng: build_rng(derive_seed(config.seed, EXPLORATION_STREAM)),
            stats: QLearningStats::default(),
            policy: None,
            config,
            env,
            space,
        };
        agent.init_q_table();
        Ok(agent)
    }

    /// Zero the Q-value of every legal action of every non-terminal state
    pub fn init_q_table(&mut self) {
        self.q_table.initialize(&self.space);
    }

    /// The greedy action of `state` and its Q-value
    pub fn max_q(&self, state: &BoardState) -> Result<(Move, f64)> {
        self.q_table.max_q(state)
    }

    /// ε-greedy selection: with probability ε a uniformly random legal
    /// action, otherwise the greedy one.
    pub fn select_action(&mut self, state: &BoardState) -> Result<Move> {
        if self.rng.random::<f64>() < self.config.epsilon {
            self.q_table
                .actions(state)?
                .choose(&mut self.rng)
                .map(|&(action, _)| action)
                .ok_or_else(|| Error::MissingQValues {
                    state: state.encode(),
                })
        } else {
            Ok(self.q_table.max_q(state)?.0)
        }
    }

    /// Play the configured number of episodes, then publish the greedy policy
    pub fn train(&mut self) -> Result<()> {
        self.train_with_observer(&mut NoopObserver)
    }

    /// [`Self::train`], reporting each finished episode to `observer`
    pub fn train_with_observer(&mut self, observer: &mut dyn TrainingObserver) -> Result<()> {
        let episodes = self.config.episodes;
        let agent = self.env.mdp().agent();
        observer.on_training_start(episodes)?;

        for episode in 1..=episodes {
            let mut state = self.env.reset()?;
            while !state.is_terminal() {
                let action = self.select_action(&state)?;
                let outcome = self.env.step(action)?;
                self.q_table.q_learning_update(&outcome)?;
                self.stats.updates += 1;
                state = outcome.next;
            }

            let status = state.evaluate_outcome(agent);
            self.stats.record(status);
            observer.on_episode_end(episode, status)?;
        }

        observer.on_training_end()?;
        log::info!(
            "q-learning finished {} episodes ({} wins, {} draws, {} losses, {} updates)",
            self.stats.episodes,
            self.stats.wins,
            self.stats.draws,
            self.stats.losses,
            self.stats.updates
        );

        self.policy = Some(self.extract_policy()?);
        Ok(())
    }

    /// Greedy policy over the Q-table. Reading it does not touch the table.
    pub fn extract_policy(&self) -> Result<Policy> {
        self.space
            .non_terminal()
            .map(|state| self.q_table.max_q(state).map(|(action, _)| (*state, action)))
            .collect()
    }

    pub fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn stats(&self) -> QLearningStats {
        self.stats
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.space
    }

    pub fn environment(&self) -> &Environment<O> {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment<O> {
        &mut self.env
    }
}

impl<O: Opponent> Solver for QLearningAgent<O> {
    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn train(&mut self) -> Result<()> {
        QLearningAgent::train(self)
    }

    fn policy(&self) -> Option<&Policy> {
        QLearningAgent::policy(self)
    }

    fn state_value(&self, state: &BoardState) -> Option<f64> {
        if state.is_terminal() {
            return self.space.contains(state).then_some(0.0);
        }
        self.q_table.max_q(state).ok().map(|(_, q)| q)
    }

    fn state_space(&self) -> &StateSpace {
        &self.space
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    fn agent(epsilon: f64, episodes: usize, seed: u64) -> QLearningAgent {
        let config = QLearningConfig::default()
            .with_epsilon(epsilon)
            .with_episodes(episodes)
            .with_seed(seed);
        QLearningAgent::new(MdpConfig::default(), config).unwrap()
    }

    #[test]
    fn test_greedy_selection_without_exploration() {
        let mut agent = agent(0.0, 0, 1);
        let empty = BoardState::new();
        assert_eq!(agent.select_action(&empty).unwrap(), Move::new(0, Player::X));
    }

    #[test]
    fn test_full_exploration_stays_legal_and_varies() {
        let mut agent = agent(1.0, 0, 2);
        let state = BoardState::from_string("X...O...._X").unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let action = agent.select_action(&state).unwrap();
            assert!(state.is_legal(action));
            seen.insert(action.position);
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_training_tallies_add_up() {
        let mut agent = agent(0.2, 200, 3);
        agent.train().unwrap();
        let stats = agent.stats();
        assert_eq!(stats.episodes, 200);
        assert_eq!(stats.wins + stats.draws + stats.losses, 200);
        // Every game takes at least three and at most five agent moves
        assert!(stats.updates >= 600 && stats.updates <= 1000);
        assert_eq!(agent.policy().unwrap().len(), 2423);
    }

    #[test]
    fn test_same_seed_same_q_values() {
        let mut a = agent(0.2, 300, 4);
        let mut b = agent(0.2, 300, 4);
        a.train().unwrap();
        b.train().unwrap();
        let empty = BoardState::new();
        assert_eq!(
            a.q_table().actions(&empty).unwrap(),
            b.q_table().actions(&empty).unwrap()
        );
        assert_eq!(a.policy(), b.policy());
    }

    #[test]
    fn test_state_value_of_terminal_state_is_zero() {
        let agent = agent(0.2, 0, 5);
        let terminal = BoardState::from_string("XXXOO....").unwrap();
        assert_eq!(agent.state_value(&terminal), Some(0.0));
        assert_eq!(agent.state_value(&BoardState::new()), Some(0.0));
    }

    #[test]
    fn test_policy_absent_before_training() {
        let agent = agent(0.2, 10, 6);
        assert!(agent.policy().is_none());
        assert_eq!(agent.extract_policy().unwrap(), agent.extract_policy().unwrap());
    }

    #[test]
    fn test_agent_as_o_trains() {
        let config = QLearningConfig::default().with_episodes(100).with_seed(7);
        let mut agent = QLearningAgent::new(MdpConfig::new(Player::O), config).unwrap();
        agent.train().unwrap();
        assert_eq!(agent.stats().episodes, 100);
        let opened = BoardState::new().play(4).unwrap();
        assert!(agent.policy().unwrap().action_for(&opened).is_some());
    }
}
