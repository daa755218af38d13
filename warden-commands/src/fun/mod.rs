pub mod eightball;
pub mod meme;
pub mod tictactoe;
