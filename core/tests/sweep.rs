use profitsim_core::{
    run_sweep,
    sweep::{ParameterLists, ParameterSweep},
    types::CombinationId,
    ParamField, SimError,
};

fn lists_2_3_1_2() -> ParameterLists {
    ParameterLists {
        employees: vec![5, 10],
        salary: vec![1_000.0, 1_500.0, 2_000.0],
        average_clients: vec![20],
        mean_order_cost: vec![100.0, 200.0],
        order_std_dev: vec![10.0],
        alpha: vec![],
        beta: vec![],
    }
}

#[test]
fn sweep_size_is_product_of_list_lengths() {
    let combinations = run_sweep(lists_2_3_1_2()).unwrap();
    assert_eq!(combinations.len(), 12);

    for (i, a) in combinations.iter().enumerate() {
        for b in &combinations[i + 1..] {
            assert_ne!(a, b, "duplicate combination {a}");
        }
    }
}

#[test]
fn rightmost_list_varies_fastest() {
    let combinations = run_sweep(lists_2_3_1_2()).unwrap();

    let first = combinations[0];
    assert_eq!((first.employees, first.salary, first.mean_order_cost), (5, 1_000.0, 100.0));

    let second = combinations[1];
    assert_eq!((second.employees, second.salary, second.mean_order_cost), (5, 1_000.0, 200.0));

    let third = combinations[2];
    assert_eq!((third.employees, third.salary, third.mean_order_cost), (5, 1_500.0, 100.0));

    let seventh = combinations[6];
    assert_eq!((seventh.employees, seventh.salary, seventh.mean_order_cost), (10, 1_000.0, 100.0));

    let last = combinations[11];
    assert_eq!((last.employees, last.salary, last.mean_order_cost), (10, 2_000.0, 200.0));
}

#[test]
fn sweep_is_re_enumerable() {
    let sweep = ParameterSweep::new(lists_2_3_1_2()).unwrap();

    let first: Vec<_> = sweep.iter().collect();
    let second: Vec<_> = (&sweep).into_iter().collect();

    assert_eq!(first, second);
    assert_eq!(sweep.iter().len(), sweep.len());
    assert_eq!(sweep.combination_at(CombinationId(11)), Some(first[11]));
    assert_eq!(sweep.combination_at(CombinationId(12)), None);
}

#[test]
fn iterator_nth_skips_ahead() {
    let sweep = ParameterSweep::new(lists_2_3_1_2()).unwrap();
    let mut iter = sweep.iter();
    assert_eq!(iter.nth(4), sweep.combination_at(CombinationId(4)));
    assert_eq!(iter.len(), 7);
}

#[test]
fn risk_shapes_expand_as_innermost_fields() {
    let mut lists = lists_2_3_1_2();
    lists.alpha = vec![1, 2];
    lists.beta = vec![3];

    let combinations = run_sweep(lists).unwrap();
    assert_eq!(combinations.len(), 24);
    assert_eq!(combinations[0].risk_shape(), Some((1, 3)));
    assert_eq!(combinations[1].risk_shape(), Some((2, 3)));
    assert_eq!(combinations[0].salary, combinations[1].salary);
}

#[test]
fn omitted_risk_shapes_leave_combinations_dynamic() {
    let combinations = run_sweep(lists_2_3_1_2()).unwrap();
    assert!(combinations.iter().all(|c| c.risk_shape().is_none()));
}

#[test]
fn empty_list_is_rejected() {
    let mut lists = lists_2_3_1_2();
    lists.average_clients.clear();

    let err = ParameterSweep::new(lists).unwrap_err();
    assert!(
        matches!(err, SimError::EmptyParameterList { field: ParamField::AverageClients }),
        "unexpected error {err:?}"
    );
}

#[test]
fn alpha_without_beta_is_rejected() {
    let mut lists = lists_2_3_1_2();
    lists.alpha = vec![2];

    let err = ParameterSweep::new(lists).unwrap_err();
    assert!(matches!(err, SimError::IncompleteRiskShape), "unexpected error {err:?}");
}

#[test]
fn single_value_fields_do_not_vary() {
    let lists = lists_2_3_1_2();
    assert!(lists.varies(ParamField::Employees));
    assert!(lists.varies(ParamField::Salary));
    assert!(!lists.varies(ParamField::AverageClients));
    assert!(!lists.varies(ParamField::OrderStdDev));
    assert!(!lists.varies(ParamField::Alpha));
}
