use assert_cmd::Command;

// ================================================================================================
// simtree draw
// ================================================================================================

#[test]
fn command_draw_abc() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd.arg("draw").arg("tests/newick/abc.nwk").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, " /- A\n/+\n|\\- B\n+\n\\-- C\n");

    Ok(())
}

#[test]
fn command_draw_forest() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd.arg("draw").arg("tests/newick/forest.nwk").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let expected = "\
/- A
+
\\- B

  /- C
/-+
| \\- D
+
| /- E
\\-+
  \\- F
";
    assert_eq!(stdout, expected);

    Ok(())
}

#[test]
fn command_draw_catarrhini() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd
        .arg("draw")
        .arg("tests/newick/catarrhini.nwk")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // one line per leaf and one per internal edge
    assert_eq!(stdout.lines().count(), 13);
    for label in ["Homo", "Pongo", "Cercopithecus"] {
        assert!(stdout.contains(&format!("- {}\n", label)));
    }
    assert!(stdout.contains("+ Catarrhini\n"));
    assert!(stdout.contains("+ Hominidae\n"));

    Ok(())
}

#[test]
fn command_draw_box() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd
        .arg("draw")
        .arg("stdin")
        .arg("--style")
        .arg("box")
        .write_stdin("(A,B);")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "┌─ A\n┤\n└─ B\n");

    Ok(())
}

// ================================================================================================
// simtree write
// ================================================================================================

#[test]
fn command_write_quoted() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd.arg("write").arg("tests/newick/quoted.nwk").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "(Homo_sapiens:1,'Pan (chimp)':2,'it''s':3);\n");

    Ok(())
}

#[test]
fn command_write_no_quote() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd
        .arg("write")
        .arg("tests/newick/quoted.nwk")
        .arg("--no-quote")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "(Homo_sapiens:1,Pan (chimp):2,its:3);\n");

    Ok(())
}

#[test]
fn command_write_simmap() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd.arg("write").arg("tests/newick/simmap.nwk").output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "((A:1,B:1):2,C:3);\n");

    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd
        .arg("write")
        .arg("tests/newick/simmap.nwk")
        .arg("--simmap")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "((A:{0,0.5:1,0.5},B:{0,1}):{1,2},C:{0,1.5:1,1.5});\n");

    Ok(())
}

#[test]
fn command_write_indent() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd
        .arg("write")
        .arg("tests/newick/abc.nwk")
        .arg("--text")
        .arg("  ")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "(\n  (\n    A,\n    B\n  ),\n  C\n);\n");

    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd
        .arg("write")
        .arg("tests/newick/abc.nwk")
        .arg("--text")
        .arg("  ")
        .arg("--compact")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "((A,B),C);\n");

    Ok(())
}

#[test]
fn command_write_round_trip() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd
        .arg("write")
        .arg("tests/newick/catarrhini.nwk")
        .output()?;
    let first = String::from_utf8(output.stdout)?;

    let mut cmd = Command::cargo_bin("simtree")?;
    let output = cmd
        .arg("write")
        .arg("stdin")
        .write_stdin(first.clone())
        .output()?;
    let second = String::from_utf8(output.stdout)?;

    assert_eq!(first, second);
    assert_eq!(
        first.trim_end(),
        std::fs::read_to_string("tests/newick/catarrhini.nwk")?.trim_end()
    );

    Ok(())
}
