//! Tests for the background search worker.

use crossbeam_channel::{Receiver, Sender};
use morris_core::{
    Board, BoardView, Cell, FirstLegal, Move, Node, Position, SearchResult, SearchWorker, Side,
    Strategy,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Strategy that blocks until released, then plays the first legal move.
struct Gated {
    release: Receiver<()>,
    calls: AtomicUsize,
}

impl Gated {
    fn new() -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let strategy = Arc::new(Self {
            release: rx,
            calls: AtomicUsize::new(0),
        });
        (strategy, tx)
    }
}

impl Strategy for Gated {
    fn search(&self, position: Position, side: Side) -> SearchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.release.recv();
        FirstLegal.search(position, side)
    }

    fn name(&self) -> &str {
        "gated"
    }
}

fn n(index: usize) -> Node {
    Node::new(index).expect("index in range")
}

#[test]
fn test_start_sets_running_until_strategy_returns() {
    let board = Board::new();
    let (strategy, release) = Gated::new();
    let mut worker = SearchWorker::new();

    worker.start(&board, strategy.clone());
    assert!(worker.is_running());
    assert_eq!(worker.get_result(), None);

    release.send(()).expect("strategy is waiting");
    worker.join();

    assert!(!worker.is_running());
    let result = worker.get_result().expect("result published");
    assert_eq!(result.to_move(Side::White), Some(Move::place(Side::White, n(0))));
    assert_eq!(strategy.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_result_is_stable_until_next_start() {
    let board = Board::new();
    let mut worker = SearchWorker::new();

    worker.start(&board, Arc::new(FirstLegal));
    worker.join();
    let first = worker.get_result();
    for _ in 0..10 {
        assert_eq!(worker.get_result(), first);
    }

    worker.start(&board, Arc::new(FirstLegal));
    worker.join();
    assert_eq!(worker.get_result(), first);
}

#[test]
fn test_polling_observes_completion() {
    let board = Board::new();
    let mut worker = SearchWorker::new();
    worker.start(&board, Arc::new(FirstLegal));

    while worker.is_running() {
        std::thread::yield_now();
    }
    assert!(worker.get_result().is_some());
}

#[test]
fn test_single_empty_node_is_chosen() {
    let mut cells = [Cell::Occupied(Side::Black); 24];
    for index in [0, 3, 6, 9, 12, 15, 18, 21, 1, 5, 8] {
        cells[index] = Cell::Occupied(Side::White);
    }
    cells[17] = Cell::Empty;
    let position = Position::from_cells(cells, Side::White).with_in_hand(Side::White, 1);
    let board = Board::from_position(position);

    let mut worker = SearchWorker::new();
    worker.start(&board, Arc::new(FirstLegal));
    worker.join();

    let result = worker.get_result().expect("result published");
    assert_eq!(result.place, Some(n(17)));
}

#[test]
fn test_drop_waits_for_running_search() {
    let board = Board::new();
    let (strategy, release) = Gated::new();
    let mut worker = SearchWorker::new();
    worker.start(&board, strategy.clone());

    let releaser = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(20));
        release.send(()).expect("strategy is waiting");
    });

    drop(worker);
    // The strategy has finished, so only the test's handle remains.
    assert_eq!(Arc::strong_count(&strategy), 1);
    releaser.join().expect("releaser thread");
}

#[test]
fn test_repeated_searches_keep_thread_count_bounded() {
    let board = Board::new();
    let mut worker = SearchWorker::new();
    for _ in 0..50 {
        worker.start(&board, Arc::new(FirstLegal));
        assert!(worker.live_threads() <= 1);
        worker.join();
        assert_eq!(worker.live_threads(), 0);
    }
    assert_eq!(worker.searches_started(), 50);
}

#[test]
fn test_replacing_busy_worker_blocks_until_done() {
    let board = Board::new();
    let (strategy, release) = Gated::new();
    for _ in 0..10 {
        release.send(()).expect("queue release");
    }

    let mut worker = SearchWorker::pooled();
    for round in 1..=10 {
        worker.start(&board, strategy.clone());
        worker = SearchWorker::pooled();
        assert_eq!(strategy.calls.load(Ordering::SeqCst), round);
        assert_eq!(Arc::strong_count(&strategy), 1);
    }
    assert_eq!(worker.live_threads(), 0);
}

#[test]
fn test_pooled_worker_matches_spawned_results() {
    let board = Board::new();
    let mut spawned = SearchWorker::new();
    let mut pooled = SearchWorker::pooled();

    spawned.start(&board, Arc::new(FirstLegal));
    pooled.start(&board, Arc::new(FirstLegal));
    spawned.join();
    pooled.join();

    assert_eq!(spawned.get_result(), pooled.get_result());
    assert_eq!(board.turn(), Side::White);
}
