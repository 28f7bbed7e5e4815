//! End-to-end behaviour of the list view engine on the student schema.

use chrono::NaiveDate;
use roster::app::schema::{student_schema, CLASS, SEARCH, STATUS};
use roster::domain::{Student, StudentStatus};
use roster::listview::{ListViewState, SortDirection};
use rstest::rstest;

fn student(id: i64, name: &str, age: u32, status: StudentStatus) -> Student {
    Student {
        id,
        name: name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(2014, 1, 1).unwrap(),
        email: None,
        status,
        class_id: Some(1 + id % 3),
        class_name: Some(format!("{}A", 1 + id % 3)),
        age,
        phone: None,
        notes: None,
    }
}

/// 25 students named "A" through "Y"; the first 15 are active.
fn alphabet() -> Vec<Student> {
    let mut students: Vec<Student> = ('A'..='Y')
        .zip(1_i64..)
        .map(|(letter, id)| {
            let status = if id <= 15 {
                StudentStatus::Active
            } else {
                StudentStatus::Inactive
            };
            let age = 6 + u32::try_from(id % 10).unwrap();
            student(id, &letter.to_string(), age, status)
        })
        .collect();
    students.reverse();
    students
}

fn view(page_size: usize) -> ListViewState<Student> {
    ListViewState::new(student_schema(false), page_size).unwrap()
}

fn names(students: &[Student]) -> Vec<&str> {
    students.iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn first_page_of_twenty_five() {
    let mut list = view(10);
    list.set_records(alphabet());

    let info = list.pagination_info();
    assert_eq!(info.total_count, 25);
    assert_eq!(info.total_pages, 3);
    assert_eq!(info.current_page, 1);
    assert_eq!(
        names(list.visible_page()),
        vec!["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]
    );
}

#[test]
fn status_filter_counts_active_students() {
    let mut list = view(10);
    list.set_records(alphabet());
    list.set_filter(STATUS, Some("ativo"));

    let info = list.pagination_info();
    assert_eq!(info.total_count, 15);
    assert_eq!(info.total_pages, 2);
    assert!(list.derived().iter().all(|s| s.status == StudentStatus::Active));
}

#[test]
fn narrowing_filter_clamps_page() {
    let mut list = view(10);
    list.set_records(alphabet());
    list.go_to_page(3);
    assert_eq!(names(list.visible_page()), vec!["U", "V", "W", "X", "Y"]);

    list.set_filter(SEARCH, Some("b"));
    let info = list.pagination_info();
    assert_eq!(info.total_pages, 1);
    assert_eq!(info.current_page, 1);
    assert_eq!(names(list.visible_page()), vec!["B"]);
}

#[test]
fn age_descending() {
    let mut list = view(10);
    list.set_records(vec![
        student(1, "Ana", 10, StudentStatus::Active),
        student(2, "Bia", 7, StudentStatus::Active),
        student(3, "Caio", 15, StudentStatus::Active),
    ]);
    list.set_sort("idade", SortDirection::Desc);

    let ages: Vec<u32> = list.visible_page().iter().map(|s| s.age).collect();
    assert_eq!(ages, vec![15, 10, 7]);
}

#[test]
fn empty_set() {
    let mut list = view(10);
    list.set_records(Vec::new());

    let info = list.pagination_info();
    assert!(list.visible_page().is_empty());
    assert_eq!(info.total_count, 0);
    assert_eq!(info.total_pages, 0);
    assert_eq!(info.current_page, 1);
    assert!(!list.next_page());
    assert!(!list.prev_page());
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(10)]
#[case(25)]
#[case(40)]
fn pages_partition_the_derived_set(#[case] page_size: usize) {
    let mut list = view(page_size);
    list.set_records(alphabet());
    list.set_filter(STATUS, Some("ativo"));

    let info = list.pagination_info();
    assert_eq!(info.total_pages, info.total_count.div_ceil(page_size));

    let mut seen = Vec::new();
    for page in 1..=info.total_pages {
        list.go_to_page(page);
        assert!(list.visible_page().len() <= page_size);
        seen.extend(list.visible_page().iter().map(|s| s.id));
    }
    let derived: Vec<i64> = list.derived().iter().map(|s| s.id).collect();
    assert_eq!(seen, derived);
}

#[rstest]
#[case("nome", SortDirection::Asc)]
#[case("nome", SortDirection::Desc)]
#[case("idade", SortDirection::Asc)]
#[case("idade", SortDirection::Desc)]
#[case("turma", SortDirection::Asc)]
#[case("status", SortDirection::Desc)]
fn derived_set_is_a_sorted_subset(#[case] field: &str, #[case] direction: SortDirection) {
    let mut list = view(10);
    let all = alphabet();
    list.set_records(all.clone());
    list.set_filter(CLASS, Some("2"));
    list.set_sort(field, direction);

    assert!(list.derived().iter().all(|s| all.contains(s)));
    assert!(list.derived().iter().all(|s| s.class_id == Some(2)));

    let again: Vec<i64> = list.derived().iter().map(|s| s.id).collect();
    list.set_sort(field, direction);
    let twice: Vec<i64> = list.derived().iter().map(|s| s.id).collect();
    assert_eq!(again, twice);
}

#[test]
fn page_navigation_stays_in_bounds() {
    let mut list = view(10);
    list.set_records(alphabet());

    assert!(!list.prev_page());
    assert!(list.next_page());
    assert!(list.next_page());
    assert!(!list.next_page());
    assert_eq!(list.pagination_info().current_page, 3);

    list.go_to_page(0);
    assert_eq!(list.pagination_info().current_page, 1);
    list.go_to_page(99);
    assert_eq!(list.pagination_info().current_page, 3);
}

#[test]
fn replacing_records_keeps_filters_and_sort() {
    let mut list = view(10);
    list.set_records(alphabet());
    list.set_filter(STATUS, Some("inativo"));
    list.set_sort("nome", SortDirection::Desc);

    let mut fresh = alphabet();
    fresh.push(student(26, "Z", 12, StudentStatus::Inactive));
    list.set_records(fresh);

    assert_eq!(list.pagination_info().total_count, 11);
    assert_eq!(list.visible_page()[0].name, "Z");
}

#[test]
fn fuzzy_search_matches_every_token() {
    let mut list = ListViewState::new(student_schema(true), 10).unwrap();
    list.set_records(vec![
        student(1, "Ana Souza", 10, StudentStatus::Active),
        student(2, "Bruno Silva", 11, StudentStatus::Active),
        student(3, "Anabela Santos", 12, StudentStatus::Active),
    ]);

    list.set_filter(SEARCH, Some("ana sz"));
    assert_eq!(names(list.derived()), vec!["Ana Souza"]);

    list.set_filter(SEARCH, Some("   "));
    assert_eq!(list.pagination_info().total_count, 3);
}

#[rstest]
#[case(STATUS, "ativo")]
#[case(STATUS, "inativo")]
#[case(CLASS, "3")]
#[case(SEARCH, "a")]
#[case(SEARCH, "nobody")]
fn setting_a_filter_twice_changes_nothing(#[case] key: &str, #[case] value: &str) {
    let mut list = view(10);
    list.set_records(alphabet());
    list.set_sort("idade", SortDirection::Desc);

    list.set_filter(key, Some(value));
    let once: Vec<i64> = list.derived().iter().map(|s| s.id).collect();
    let once_info = list.pagination_info();

    list.set_filter(key, Some(value));
    let twice: Vec<i64> = list.derived().iter().map(|s| s.id).collect();

    assert_eq!(once, twice);
    assert_eq!(once_info, list.pagination_info());
}

#[rstest]
#[case("nome")]
#[case("id")]
#[case("data_nascimento")]
fn descending_reverses_ascending_on_distinct_keys(#[case] field: &str) {
    let mut list = view(10);
    let mut students = alphabet();
    for (offset, student) in students.iter_mut().enumerate() {
        let day = u32::try_from(offset).unwrap() + 1;
        student.birth_date = NaiveDate::from_ymd_opt(2013, 3, day).unwrap();
    }
    list.set_records(students);

    list.set_sort(field, SortDirection::Asc);
    let ascending: Vec<i64> = list.derived().iter().map(|s| s.id).collect();
    list.set_sort(field, SortDirection::Desc);
    let mut descending: Vec<i64> = list.derived().iter().map(|s| s.id).collect();

    descending.reverse();
    assert_eq!(ascending, descending);
    assert_eq!(ascending.len(), 25);
}
