use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn empty_stack_underflows() {
    let mut stack: Stack<u32> = Stack::new();
    assert!(stack.is_empty());
    assert_eq!(stack.pop(), Err(StackError::Underflow));
    assert_eq!(stack.peek(), Err(StackError::Underflow));
    assert_eq!(stack.peek_nth(0), Err(StackError::Underflow));
}

#[test]
fn push_pop_peek() {
    let mut stack = Stack::new();
    assert_eq!(stack.push(1), Ok(()));
    assert_eq!(stack.push(2), Ok(()));
    assert_eq!(stack.peek(), Ok(2));
    assert_eq!(stack.len(), 2);
    assert_eq!(stack.pop(), Ok(2));
    assert_eq!(stack.pop(), Ok(1));
    assert_eq!(stack.pop(), Err(StackError::Underflow));
}

#[test]
fn capacity_doubles_from_zero() {
    let mut stack = Stack::new();
    assert_eq!(stack.capacity(), 0);
    let mut seen = Vec::new();
    for value in 0..9 {
        assert_eq!(stack.push(value), Ok(()));
        seen.push(stack.capacity());
    }
    assert_eq!(seen, vec![1, 2, 4, 4, 8, 8, 8, 8, 16]);
}

#[test]
fn preallocated_capacity_is_used_first() {
    let mut stack = Stack::with_capacity(3);
    for value in 0..3 {
        assert_eq!(stack.push(value), Ok(()));
    }
    assert_eq!(stack.capacity(), 3);
    assert_eq!(stack.push(3), Ok(()));
    assert_eq!(stack.capacity(), 6);
}

#[test]
fn peek_nth_counts_from_top() {
    let mut stack = Stack::new();
    for value in [10, 20, 30] {
        assert_eq!(stack.push(value), Ok(()));
    }
    assert_eq!(stack.peek_nth(0), Ok(30));
    assert_eq!(stack.peek_nth(2), Ok(10));
    assert_eq!(stack.peek_nth(3), Err(StackError::Underflow));
}

#[test]
fn truncate_and_clear_keep_capacity() {
    let mut stack = Stack::new();
    for value in 0..5 {
        assert_eq!(stack.push(value), Ok(()));
    }
    stack.truncate(2);
    assert_eq!(stack.as_slice(), &[0, 1]);
    stack.truncate(10);
    assert_eq!(stack.len(), 2);
    stack.clear();
    assert!(stack.is_empty());
    assert_eq!(stack.capacity(), 8);
}

#[test]
fn iterates_bottom_first() {
    let mut stack = Stack::new();
    for value in [3, 1, 4] {
        assert_eq!(stack.push(value), Ok(()));
    }
    let collected: Vec<i32> = (&stack).into_iter().copied().collect();
    assert_eq!(collected, vec![3, 1, 4]);
    assert_eq!(stack.iter().rev().copied().collect::<Vec<_>>(), vec![4, 1, 3]);
    let mut sum = 0;
    for value in &stack {
        sum += value;
    }
    assert_eq!(sum, 8);
}

#[test]
fn error_messages() {
    assert_eq!(StackError::Underflow.to_string(), "stack underflow");
    assert_eq!(
        StackError::GrowthFailed { requested: 64 }.to_string(),
        "stack growth to 64 slots failed"
    );
}

proptest! {
    #[test]
    fn pops_reverse_pushes(values in proptest::collection::vec(any::<u64>(), 0..200)) {
        let mut stack = Stack::new();
        for &value in &values {
            prop_assert_eq!(stack.push(value), Ok(()));
            prop_assert!(stack.len() <= stack.capacity());
        }
        let mut popped = Vec::with_capacity(values.len());
        while let Ok(value) = stack.pop() {
            popped.push(value);
        }
        popped.reverse();
        prop_assert_eq!(popped, values);
        prop_assert_eq!(stack.peek(), Err(StackError::Underflow));
    }
}
