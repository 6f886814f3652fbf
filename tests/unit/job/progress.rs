use super::*;

#[test]
fn fraction_and_done() {
    let u = ProgressUpdate {
        completed: 1,
        total: 4,
    };
    assert_eq!(u.fraction(), 0.25);
    assert!(!u.is_done());

    let empty = ProgressUpdate {
        completed: 0,
        total: 0,
    };
    assert_eq!(empty.fraction(), 1.0);
    assert!(empty.is_done());
}

#[test]
fn closures_are_observers() {
    let mut seen = Vec::new();
    {
        let mut obs = |u: ProgressUpdate| seen.push(u.completed);
        let dyn_obs: &mut dyn ProgressObserver = &mut obs;
        dyn_obs.on_progress(ProgressUpdate {
            completed: 1,
            total: 2,
        });
        dyn_obs.on_progress(ProgressUpdate {
            completed: 2,
            total: 2,
        });
    }
    assert_eq!(seen, vec![1, 2]);
}
