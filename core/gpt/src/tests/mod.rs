//! 結合寄りのテスト（ポートをスタブに差し替えて usecase を通す）

mod context_window_tests;
