use profitsim_core::{
    combination::FieldValue,
    group_by, run_sweep, simulate,
    simulation::{MonthOutcome, RunOutcome},
    sweep::ParameterLists,
    types::CombinationId,
    ParamField, ParameterCombination, SimError,
};
use std::collections::BTreeMap;

fn employees_only_sweep() -> Vec<ParameterCombination> {
    run_sweep(ParameterLists {
        employees: vec![5, 10],
        salary: vec![1_000.0],
        average_clients: vec![50],
        mean_order_cost: vec![100.0],
        order_std_dev: vec![10.0],
        alpha: vec![],
        beta: vec![],
    })
    .unwrap()
}

fn simulate_all(combinations: &[ParameterCombination]) -> BTreeMap<CombinationId, RunOutcome> {
    combinations
        .iter()
        .enumerate()
        .map(|(i, c)| (CombinationId(i), simulate(c, 123_456_789, 12).unwrap()))
        .collect()
}

fn flat_outcome(profit: f64, months: usize) -> RunOutcome {
    RunOutcome {
        final_amount: profit * months as f64,
        series: vec![MonthOutcome { profit, clients: 0, successes: 0 }; months],
    }
}

#[test]
fn varying_field_collapses_into_one_group() {
    let combinations = employees_only_sweep();
    let outcomes = simulate_all(&combinations);

    let groups = group_by(&combinations, &outcomes, ParamField::Employees);

    assert_eq!(groups.len(), 1, "expected one employees family");
    let group = &groups[0];
    assert_eq!(group.len(), 2);
    assert!(group.is_comparable());
    assert_eq!(group.distinct_varying_values(), vec![FieldValue::Int(5), FieldValue::Int(10)]);
    assert!(group.members.iter().all(|m| m.outcome.is_some()));
}

#[test]
fn single_valued_field_yields_trivial_groups() {
    let combinations = employees_only_sweep();
    let outcomes = simulate_all(&combinations);

    let groups = group_by(&combinations, &outcomes, ParamField::Salary);

    assert_eq!(groups.len(), 2, "expected one trivial group per employee count");
    for group in &groups {
        assert_eq!(group.len(), 1);
        assert!(!group.is_comparable());
    }
}

#[test]
fn key_excludes_only_the_varying_field() {
    let combinations = employees_only_sweep();
    let outcomes = BTreeMap::new();

    let groups = group_by(&combinations, &outcomes, ParamField::Employees);
    let key = &groups[0].key;

    assert_eq!(key.varying, ParamField::Employees);
    assert_eq!(key.get(ParamField::Employees), None);
    assert_eq!(key.get(ParamField::Salary), Some(FieldValue::Real(1_000.0)));
    assert_eq!(key.get(ParamField::Alpha), Some(FieldValue::Absent));
    assert_eq!(key.to_string(), "salary=1000, average_clients=50, mean_order_cost=100, order_std_dev=10");
}

#[test]
fn salary_within_tolerance_shares_a_key() {
    let base = employees_only_sweep()[0];
    let nudged = ParameterCombination { salary: base.salary + 1e-12, employees: 10, ..base };
    let combinations = vec![base, nudged];

    let outcomes = BTreeMap::new();
    let groups = group_by(&combinations, &outcomes, ParamField::Employees);
    assert_eq!(groups.len(), 1, "1e-12 salary drift must not split the group");
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn salary_outside_tolerance_splits_groups() {
    let base = employees_only_sweep()[0];
    let other = ParameterCombination { salary: base.salary + 1e-6, employees: 10, ..base };
    let combinations = vec![base, other];

    let outcomes = BTreeMap::new();
    let groups = group_by(&combinations, &outcomes, ParamField::Employees);
    assert_eq!(groups.len(), 2);
}

#[test]
fn tolerance_matches_across_neighbouring_values() {
    let base = ParameterCombination { salary: 0.0, ..employees_only_sweep()[0] };
    let below = ParameterCombination { salary: -1.5e-9, ..base };
    let between = ParameterCombination { salary: -0.7e-9, employees: 10, ..base };
    let combinations = vec![base, below, between];

    let outcomes = BTreeMap::new();
    let groups = group_by(&combinations, &outcomes, ParamField::Employees);

    assert_eq!(groups.len(), 2, "-1.5e-9 is outside tolerance of 0.0");
    let ids: Vec<Vec<usize>> = groups
        .iter()
        .map(|g| g.members.iter().map(|m| m.id.0).collect())
        .collect();
    assert_eq!(ids, vec![vec![0, 2], vec![1]], "a value matching two anchors joins the older group");
}

#[test]
fn wide_sweeps_group_every_combination() {
    let salaries: Vec<f64> = (0..20_000).map(|i| 1_000.0 + i as f64 * 0.5).collect();
    let combinations = run_sweep(ParameterLists {
        employees: vec![5, 10],
        salary: salaries.clone(),
        average_clients: vec![20],
        mean_order_cost: vec![100.0],
        order_std_dev: vec![10.0],
        alpha: vec![],
        beta: vec![],
    })
    .unwrap();

    let outcomes = BTreeMap::new();
    let groups = group_by(&combinations, &outcomes, ParamField::Employees);

    assert_eq!(groups.len(), salaries.len());
    for (group, salary) in groups.iter().zip(&salaries) {
        assert_eq!(group.key.get(ParamField::Salary), Some(FieldValue::Real(*salary)));
        assert_eq!(group.len(), 2);
        assert!(group.is_comparable());
    }
}

#[test]
fn groups_keep_first_seen_and_sweep_order() {
    let combinations = run_sweep(ParameterLists {
        employees: vec![5, 10],
        salary: vec![1_000.0, 2_000.0],
        average_clients: vec![20],
        mean_order_cost: vec![100.0],
        order_std_dev: vec![10.0],
        alpha: vec![],
        beta: vec![],
    })
    .unwrap();

    let outcomes = BTreeMap::new();
    let groups = group_by(&combinations, &outcomes, ParamField::Salary);

    assert_eq!(groups.len(), 2);
    let ids: Vec<Vec<usize>> = groups
        .iter()
        .map(|g| g.members.iter().map(|m| m.id.0).collect())
        .collect();
    assert_eq!(ids, vec![vec![0, 1], vec![2, 3]]);
}

#[test]
fn failed_runs_stay_in_their_group_without_a_series() {
    let combinations = employees_only_sweep();
    let mut outcomes = BTreeMap::new();
    outcomes.insert(CombinationId(1), flat_outcome(10.0, 3));

    let groups = group_by(&combinations, &outcomes, ParamField::Employees);
    let group = &groups[0];

    assert_eq!(group.len(), 2);
    assert!(group.members[0].outcome.is_none());
    assert!(group.members[1].outcome.is_some());
}

#[test]
fn degenerate_series_are_not_comparable() {
    let combinations = employees_only_sweep();
    let mut outcomes = BTreeMap::new();
    outcomes.insert(CombinationId(0), flat_outcome(-500.0, 6));
    outcomes.insert(
        CombinationId(1),
        RunOutcome {
            final_amount: 30.0,
            series: vec![
                MonthOutcome { profit: 10.0, clients: 2, successes: 1 },
                MonthOutcome { profit: 20.0, clients: 3, successes: 2 },
            ],
        },
    );

    let groups = group_by(&combinations, &outcomes, ParamField::Employees);
    let comparable = groups[0].comparable_members();

    assert_eq!(comparable.len(), 1, "a flat series is skipped, not an error");
    assert_eq!(comparable[0].id, CombinationId(1));
}

#[test]
fn each_varying_field_regroups_the_same_set() {
    let combinations = run_sweep(ParameterLists {
        employees: vec![5, 10, 15],
        salary: vec![1_000.0, 2_000.0],
        average_clients: vec![20, 40],
        mean_order_cost: vec![100.0],
        order_std_dev: vec![10.0],
        alpha: vec![],
        beta: vec![],
    })
    .unwrap();
    let outcomes = BTreeMap::new();

    let by_employees = group_by(&combinations, &outcomes, ParamField::Employees);
    let by_salary = group_by(&combinations, &outcomes, ParamField::Salary);
    let by_clients = group_by(&combinations, &outcomes, ParamField::AverageClients);

    assert_eq!(by_employees.len(), 4);
    assert_eq!(by_salary.len(), 6);
    assert_eq!(by_clients.len(), 6);
    for groups in [&by_employees, &by_salary, &by_clients] {
        let members: usize = groups.iter().map(|g| g.len()).sum();
        assert_eq!(members, combinations.len(), "grouping must not drop combinations");
    }
}

#[test]
fn field_names_parse_in_both_spellings() {
    assert_eq!("salary".parse::<ParamField>().unwrap(), ParamField::Salary);
    assert_eq!("AverageClientsMonth".parse::<ParamField>().unwrap(), ParamField::AverageClients);
    assert_eq!("MeanCostOrder".parse::<ParamField>().unwrap(), ParamField::MeanOrderCost);

    let err = "bonus".parse::<ParamField>().unwrap_err();
    assert!(matches!(err, SimError::UnknownField { ref name } if name == "bonus"));
}
