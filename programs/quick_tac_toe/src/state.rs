//! Program state and domain types.
//!
//! Every account here is a PDA owned by the program. Transition methods validate their
//! preconditions before touching any field, so a returned error never leaves a half-applied
//! change behind.

use anchor_lang::prelude::*;

use crate::board::{self, Grid};
use crate::constants::{BOARD_SIDE, FIRST_GAME_ID, PROGRAM_VERSION};
use crate::error::TicTacToeError;

#[account]
#[derive(InitSpace, Default)]
/// Singleton holding the game id sequence and the play-token mint it controls.
pub struct ProgramState {
    pub version: u64,
    /// Id assigned to the next `create_game`.
    pub next_game_id: u64,
    /// Play-token mint; its mint authority is this account.
    pub mint: Pubkey,
    pub bump: u8,
    pub mint_bump: u8,
}

impl ProgramState {
    pub fn init(&mut self, mint: Pubkey, bump: u8, mint_bump: u8) {
        self.version = PROGRAM_VERSION;
        self.next_game_id = FIRST_GAME_ID;
        self.mint = mint;
        self.bump = bump;
        self.mint_bump = mint_bump;
    }

    /// Hand out the current id and advance the sequence.
    pub fn take_game_id(&mut self) -> Result<u64> {
        let id = self.next_game_id;
        self.next_game_id = id
            .checked_add(1)
            .ok_or(TicTacToeError::ArithmeticOverflow)?;
        Ok(id)
    }
}

#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace,
)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

#[account]
#[derive(InitSpace, Default)]
/// Per-wallet record, derived from `["player", authority]`.
pub struct Player {
    pub authority: Pubkey,
    pub record: Record,
    pub airdrop_received: bool,
    /// Flips false -> true exactly once, on the first successful claim.
    pub reward_claimed: bool,
    pub reward_mint: Option<Pubkey>,
    pub bump: u8,
}

impl Player {
    pub fn is_initialized(&self) -> bool {
        self.authority != Pubkey::default()
    }

    pub fn init(&mut self, authority: Pubkey, bump: u8) -> Result<()> {
        require!(!self.is_initialized(), TicTacToeError::AlreadyExists);
        self.authority = authority;
        self.record = Record::default();
        self.airdrop_received = false;
        self.reward_claimed = false;
        self.reward_mint = None;
        self.bump = bump;
        Ok(())
    }

    pub fn record_result(&mut self, outcome: Outcome) -> Result<()> {
        let counter = match outcome {
            Outcome::Win => &mut self.record.wins,
            Outcome::Loss => &mut self.record.losses,
            Outcome::Tie => &mut self.record.ties,
        };
        *counter = counter
            .checked_add(1)
            .ok_or(TicTacToeError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn claim_reward(&mut self, reward_mint: Pubkey) -> Result<()> {
        require!(self.record.wins >= 1, TicTacToeError::NotEligible);
        require!(!self.reward_claimed, TicTacToeError::AlreadyClaimed);
        self.reward_claimed = true;
        self.reward_mint = Some(reward_mint);
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum Mark {
    X,
    O,
}

#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace,
)]
pub enum GameStatus {
    #[default]
    NotStarted,
    Active,
    Won,
    Tie,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Tie)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub row: u8,
    pub column: u8,
}

impl Square {
    pub fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }
}

#[account]
#[derive(InitSpace, Default)]
/// One match, derived from `["new_game", id as u64 LE]`.
pub struct Game {
    pub id: u64,
    pub player_x: Pubkey,
    /// Unset until `join_game`.
    pub player_o: Option<Pubkey>,
    /// 0 before the join, 1 on X's first move; frozen once the game ends.
    pub turn: u8,
    pub status: GameStatus,
    pub board: [[Option<Mark>; BOARD_SIDE]; BOARD_SIDE],
    pub winner: Option<Pubkey>,
    /// Tokens escrowed per seat.
    pub stake: u64,
    pub bump: u8,
    pub escrow_bump: u8,
}

impl Game {
    pub fn create(&mut self, id: u64, player_x: Pubkey, stake: u64, bump: u8, escrow_bump: u8) {
        self.id = id;
        self.player_x = player_x;
        self.player_o = None;
        self.turn = 0;
        self.status = GameStatus::NotStarted;
        self.board = Grid::default();
        self.winner = None;
        self.stake = stake;
        self.bump = bump;
        self.escrow_bump = escrow_bump;
    }

    pub fn join(&mut self, player_o: Pubkey) -> Result<()> {
        match self.status {
            GameStatus::NotStarted => {}
            GameStatus::Active => return err!(TicTacToeError::AlreadyJoined),
            GameStatus::Won | GameStatus::Tie => return err!(TicTacToeError::GameOver),
        }
        require_keys_neq!(player_o, self.player_x, TicTacToeError::SelfJoin);

        self.player_o = Some(player_o);
        self.status = GameStatus::Active;
        self.turn = 1;
        Ok(())
    }

    pub fn seat(&self, mark: Mark) -> Option<Pubkey> {
        match mark {
            Mark::X => Some(self.player_x),
            Mark::O => self.player_o,
        }
    }

    /// The other seat of `player`, if `player` holds one.
    pub fn opponent_of(&self, player: &Pubkey) -> Option<Pubkey> {
        if *player == self.player_x {
            self.player_o
        } else if Some(*player) == self.player_o {
            Some(self.player_x)
        } else {
            None
        }
    }

    pub fn current_player(&self) -> Option<Pubkey> {
        self.seat(board::actor_for(self.turn))
    }

    /// Place `player`'s mark on `square` and resolve the outcome.
    ///
    /// A win is checked before a tie, and neither advances `turn`.
    pub fn play(&mut self, player: Pubkey, square: &Square) -> Result<GameStatus> {
        match self.status {
            GameStatus::Active => {}
            GameStatus::NotStarted => return err!(TicTacToeError::GameNotStarted),
            GameStatus::Won | GameStatus::Tie => return err!(TicTacToeError::GameOver),
        }
        let mark = board::actor_for(self.turn);
        require!(self.seat(mark) == Some(player), TicTacToeError::WrongTurn);
        require!(board::in_bounds(square), TicTacToeError::OutOfBounds);
        let (row, column) = (square.row as usize, square.column as usize);
        require!(
            self.board[row][column].is_none(),
            TicTacToeError::CellOccupied
        );

        self.board[row][column] = Some(mark);

        if board::has_line(&self.board, mark) {
            self.status = GameStatus::Won;
            self.winner = Some(player);
        } else if board::is_full(&self.board) {
            self.status = GameStatus::Tie;
        } else {
            self.turn = self
                .turn
                .checked_add(1)
                .ok_or(TicTacToeError::ArithmeticOverflow)?;
        }
        Ok(self.status)
    }

    pub fn log_board(&self) {
        for (index, row) in self.board.iter().enumerate() {
            msg!("Row {}: {}", index + 1, board::render_row(row));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;
    use proptest::prelude::*;

    fn assert_fails<T: std::fmt::Debug>(result: Result<T>, expected: TicTacToeError) {
        match result {
            Err(Error::AnchorError(error)) => {
                assert_eq!(error.error_code_number, u32::from(expected), "{:?}", error)
            }
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }

    fn started_game() -> (Game, Pubkey, Pubkey) {
        let x = Pubkey::new_unique();
        let o = Pubkey::new_unique();
        let mut game = Game::default();
        game.create(1, x, 1, 255, 254);
        game.join(o).unwrap();
        (game, x, o)
    }

    #[test]
    fn create_leaves_game_waiting() {
        let x = Pubkey::new_unique();
        let mut game = Game::default();
        assert_eq!(game.status, GameStatus::NotStarted);
        assert!(!game.status.is_terminal());
        game.create(7, x, 1, 250, 249);
        assert_eq!(game.id, 7);
        assert_eq!(game.turn, 0);
        assert_eq!(game.status, GameStatus::NotStarted);
        assert_eq!(game.player_o, None);
        assert_eq!(game.board, Grid::default());
        assert_eq!(game.winner, None);
    }

    #[test]
    fn join_starts_game() {
        let (game, _, o) = started_game();
        assert_eq!(game.status, GameStatus::Active);
        assert_eq!(game.turn, 1);
        assert_eq!(game.player_o, Some(o));
    }

    #[test]
    fn cannot_join_own_game() {
        let x = Pubkey::new_unique();
        let mut game = Game::default();
        game.create(1, x, 1, 255, 254);
        assert_fails(game.join(x), TicTacToeError::SelfJoin);
        assert_eq!(game.status, GameStatus::NotStarted);
        assert_eq!(game.turn, 0);
        assert_eq!(game.player_o, None);
    }

    #[test]
    fn second_join_rejected() {
        let (mut game, _, _) = started_game();
        assert_fails(game.join(Pubkey::new_unique()), TicTacToeError::AlreadyJoined);
    }

    #[test]
    fn x_wins_down_first_column() {
        let (mut game, x, o) = started_game();
        let moves = [
            (x, Square::new(0, 0), 2),
            (o, Square::new(0, 1), 3),
            (x, Square::new(1, 0), 4),
            (o, Square::new(1, 1), 5),
        ];
        for (player, square, expected_turn) in moves {
            assert_eq!(game.play(player, &square).unwrap(), GameStatus::Active);
            assert_eq!(game.turn, expected_turn);
        }
        assert_eq!(game.board[0][0], Some(Mark::X));
        assert_eq!(game.board[0][1], Some(Mark::O));

        assert_eq!(game.play(x, &Square::new(2, 0)).unwrap(), GameStatus::Won);
        assert_eq!(game.turn, 5);
        assert_eq!(game.winner, Some(x));

        assert_fails(game.play(o, &Square::new(2, 2)), TicTacToeError::GameOver);
        assert_fails(game.join(Pubkey::new_unique()), TicTacToeError::GameOver);
    }

    #[test]
    fn full_board_ties() {
        let (mut game, x, o) = started_game();
        // X O X / X O O / O X X
        let moves = [
            (x, 0, 0),
            (o, 0, 1),
            (x, 0, 2),
            (o, 1, 1),
            (x, 1, 0),
            (o, 2, 0),
            (x, 2, 1),
            (o, 1, 2),
        ];
        for (player, row, column) in moves {
            assert_eq!(
                game.play(player, &Square::new(row, column)).unwrap(),
                GameStatus::Active
            );
        }
        assert_eq!(game.play(x, &Square::new(2, 2)).unwrap(), GameStatus::Tie);
        assert_eq!(game.turn, 9);
        assert_eq!(game.winner, None);
    }

    #[test]
    fn win_on_last_square_beats_tie() {
        let (mut game, x, o) = started_game();
        // X O X / O X O / O X X  -- X completes the diagonal with the ninth mark
        let moves = [
            (x, 0, 0),
            (o, 0, 1),
            (x, 0, 2),
            (o, 1, 0),
            (x, 1, 1),
            (o, 1, 2),
            (x, 2, 1),
            (o, 2, 0),
        ];
        for (player, row, column) in moves {
            game.play(player, &Square::new(row, column)).unwrap();
        }
        assert_eq!(game.play(x, &Square::new(2, 2)).unwrap(), GameStatus::Won);
        assert_eq!(game.winner, Some(x));
    }

    #[test]
    fn move_checks() {
        let (mut game, x, o) = started_game();
        let before = game.clone();
        assert_fails(game.play(o, &Square::new(0, 0)), TicTacToeError::WrongTurn);
        assert_fails(
            game.play(Pubkey::new_unique(), &Square::new(0, 0)),
            TicTacToeError::WrongTurn,
        );
        assert_fails(game.play(x, &Square::new(3, 0)), TicTacToeError::OutOfBounds);
        assert_fails(game.play(x, &Square::new(0, 3)), TicTacToeError::OutOfBounds);
        assert_eq!(game.board, before.board);
        assert_eq!(game.turn, before.turn);

        game.play(x, &Square::new(1, 1)).unwrap();
        assert_fails(game.play(o, &Square::new(1, 1)), TicTacToeError::CellOccupied);
        assert_eq!(game.turn, 2);
    }

    #[test]
    fn play_before_join_rejected() {
        let x = Pubkey::new_unique();
        let mut game = Game::default();
        game.create(1, x, 1, 255, 254);
        assert_fails(game.play(x, &Square::new(0, 0)), TicTacToeError::GameNotStarted);
    }

    #[test]
    fn opponents() {
        let (game, x, o) = started_game();
        assert_eq!(game.opponent_of(&x), Some(o));
        assert_eq!(game.opponent_of(&o), Some(x));
        assert_eq!(game.opponent_of(&Pubkey::new_unique()), None);
        assert_eq!(game.current_player(), Some(x));
    }

    #[test]
    fn game_ids_are_sequential() {
        let mut state = ProgramState::default();
        state.init(Pubkey::new_unique(), 255, 254);
        assert_eq!(state.take_game_id().unwrap(), 1);
        assert_eq!(state.take_game_id().unwrap(), 2);
        assert_eq!(state.next_game_id, 3);
    }

    #[test]
    fn player_init_once() {
        let owner = Pubkey::new_unique();
        let mut player = Player::default();
        player.init(owner, 253).unwrap();
        assert_eq!(player.record, Record::default());
        assert!(!player.reward_claimed);
        assert_fails(player.init(owner, 253), TicTacToeError::AlreadyExists);
    }

    #[test]
    fn records_results() {
        let mut player = Player::default();
        player.init(Pubkey::new_unique(), 253).unwrap();
        player.record_result(Outcome::Win).unwrap();
        player.record_result(Outcome::Loss).unwrap();
        player.record_result(Outcome::Tie).unwrap();
        player.record_result(Outcome::Tie).unwrap();
        assert_eq!(
            player.record,
            Record {
                wins: 1,
                losses: 1,
                ties: 2
            }
        );
    }

    #[test]
    fn reward_claimed_once_after_a_win() {
        let mut player = Player::default();
        player.init(Pubkey::new_unique(), 253).unwrap();
        let mint = Pubkey::new_unique();

        assert_fails(player.claim_reward(mint), TicTacToeError::NotEligible);
        assert!(!player.reward_claimed);

        player.record_result(Outcome::Win).unwrap();
        player.claim_reward(mint).unwrap();
        assert!(player.reward_claimed);
        assert_eq!(player.reward_mint, Some(mint));

        assert_fails(
            player.claim_reward(Pubkey::new_unique()),
            TicTacToeError::AlreadyClaimed,
        );
        assert_eq!(player.reward_mint, Some(mint));
    }

    proptest! {
        #[test]
        fn random_games_follow_the_rules(
            order in Just((0u8..9).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let (mut game, x, o) = started_game();
            for cell in order {
                if game.status.is_terminal() {
                    let turn = game.turn;
                    let status = game.status;
                    prop_assert!(game.play(x, &Square::new(cell / 3, cell % 3)).is_err());
                    prop_assert!(game.play(o, &Square::new(cell / 3, cell % 3)).is_err());
                    prop_assert_eq!(game.turn, turn);
                    prop_assert_eq!(game.status, status);
                    continue;
                }
                let mover = game.current_player().unwrap();
                let waiting = game.opponent_of(&mover).unwrap();
                let square = Square::new(cell / 3, cell % 3);

                let snapshot = game.clone();
                prop_assert!(game.play(waiting, &square).is_err());
                prop_assert_eq!(game.board, snapshot.board);
                prop_assert_eq!(game.turn, snapshot.turn);

                let turn = game.turn;
                let mark = board::actor_for(turn);
                let status = game.play(mover, &square).unwrap();
                let line = board::has_line(&game.board, mark);
                match status {
                    GameStatus::Won => {
                        prop_assert!(line);
                        prop_assert_eq!(game.winner, Some(mover));
                        prop_assert_eq!(game.turn, turn);
                    }
                    GameStatus::Tie => {
                        prop_assert!(!line);
                        prop_assert!(board::is_full(&game.board));
                        prop_assert_eq!(game.turn, turn);
                    }
                    GameStatus::Active => {
                        prop_assert!(!line);
                        prop_assert!(!board::is_full(&game.board));
                        prop_assert_eq!(game.turn, turn + 1);
                    }
                    GameStatus::NotStarted => prop_assert!(false, "game regressed"),
                }
            }
            prop_assert!(game.status.is_terminal());
        }
    }
}
