//! Built-in macro implementations. Rust port of `process_bi_with_args`,
//! `process_bi_no_args`, and `process_bi_with_args_extra` (`apps/m4/m4.c`).

use super::frame::Frame;
use super::M4;
use crate::buf::Buf;
use crate::error::M4Error;

/// Dispatches `name` (already confirmed to be a hash-table entry with an
/// absent definition, i.e. a built-in) against `args` (`None` if called
/// without parentheses at all), unshifting any textual result onto `input`.
pub(super) fn dispatch(
    m4: &mut M4,
    name: &str,
    args: Option<Vec<Vec<u8>>>,
    input: &mut Buf,
) -> Result<(), M4Error> {
    let frame = Frame::new(name, args.clone().unwrap_or_default());
    let had_args = args.is_some();

    match name {
        "define" => {
            if !had_args {
                return Err(M4Error::Fatal("define: requires arguments".into()));
            }
            let def_name = frame.arg_str(1).into_owned();
            let def = frame.arg_str(2).into_owned();
            m4.ht.upsert(&def_name, Some(&def));
            Ok(())
        }
        "undefine" => {
            if !had_args {
                return Err(M4Error::Fatal("undefine: requires arguments".into()));
            }
            let target = frame.arg_str(1).into_owned();
            m4.ht
                .delete(&target)
                .map_err(|_| M4Error::Fatal(format!("undefine: `{target}' is not defined")))
        }
        "changequote" => {
            changequote(m4, &frame, had_args)
        }
        "divert" => {
            let n: i64 = if had_args {
                parse_int(&frame.arg_str(1), "divert")?
            } else {
                0
            };
            m4.active_div = map_divert_arg(n)?;
            Ok(())
        }
        "divnum" => {
            let n = if m4.active_div == m4.diversions.len() - 1 {
                -1
            } else {
                m4.active_div as i64
            };
            input.unget_str(n.to_string().as_bytes());
            Ok(())
        }
        "undivert" => undivert(m4, &frame, had_args),
        "dumpdef" => {
            dumpdef(m4, &frame, had_args);
            Ok(())
        }
        "errprint" => {
            let joined = frame
                .args
                .iter()
                .map(|a| String::from_utf8_lossy(a).into_owned())
                .collect::<Vec<_>>()
                .join(" ");
            crate::displaylevel!(1, "{joined}\n");
            Ok(())
        }
        "ifdef" => {
            if !had_args {
                return Err(M4Error::Fatal("ifdef: requires arguments".into()));
            }
            let target = frame.arg_str(1).into_owned();
            let branch = if m4.ht.contains(&target) { frame.arg(2) } else { frame.arg(3) };
            input.unget_str(branch);
            Ok(())
        }
        "ifelse" => {
            let result = ifelse(&frame.args);
            input.unget_str(&result);
            Ok(())
        }
        "include" => {
            if !had_args {
                return Err(M4Error::Fatal("include: requires a path".into()));
            }
            let path = frame.arg_str(1).into_owned();
            let contents = crate::fs_util::read_file_bytes(std::path::Path::new(&path))
                .map_err(|e| match e {
                    crate::error::FsError::Io(io) => M4Error::Io(io),
                })?;
            input.unget_str(&contents);
            Ok(())
        }
        "len" => {
            input.unget_str(frame.arg(1).len().to_string().as_bytes());
            Ok(())
        }
        "index" => {
            let haystack = frame.arg(1);
            let needle = frame.arg(2);
            let pos = find_subslice(haystack, needle).map(|p| p as i64).unwrap_or(-1);
            input.unget_str(pos.to_string().as_bytes());
            Ok(())
        }
        "substr" => {
            input.unget_str(&substr(&frame)?);
            Ok(())
        }
        "translit" => {
            input.unget_str(&translit(frame.arg(1), frame.arg(2), frame.arg(3)));
            Ok(())
        }
        "dnl" => {
            while let Some(c) = input.get() {
                if c == b'\n' {
                    break;
                }
            }
            Ok(())
        }
        "esyscmd" => esyscmd(&frame, input),
        "maketemp" => maketemp(&frame, input),
        "incr" => arith1(&frame, input, "incr", |a| a.checked_add(1)),
        "add" => arith2(&frame, input, "add", i64::checked_add),
        "mult" => arith2(&frame, input, "mult", i64::checked_mul),
        "sub" => arith2(&frame, input, "sub", i64::checked_sub),
        "div" => arith2(&frame, input, "div", |a, b| if b == 0 { None } else { a.checked_div(b) }),
        "mod" => arith2(&frame, input, "mod", |a, b| if b == 0 { None } else { a.checked_rem(b) }),
        "htdist" => {
            m4.ht.htdist();
            Ok(())
        }
        "dirsep" => {
            input.unget_str(std::path::MAIN_SEPARATOR.to_string().as_bytes());
            Ok(())
        }
        _ => unreachable!("dispatch called with non-builtin name `{name}'"),
    }
}

fn changequote(m4: &mut M4, frame: &Frame, had_args: bool) -> Result<(), M4Error> {
    if !had_args || frame.args.iter().all(|a| a.is_empty()) {
        m4.left_quote = b'`';
        m4.right_quote = b'\'';
        return Ok(());
    }
    let l = frame.arg(1);
    let r = frame.arg(2);
    if l.len() != 1 || r.len() != 1 {
        return Err(M4Error::BadChangequote);
    }
    let (l, r) = (l[0], r[0]);
    let forbidden = |b: u8| b == b',' || b == b'(' || b == b')' || !b.is_ascii_graphic();
    if l == r || forbidden(l) || forbidden(r) {
        return Err(M4Error::BadChangequote);
    }
    m4.left_quote = l;
    m4.right_quote = r;
    Ok(())
}

fn map_divert_arg(n: i64) -> Result<usize, M4Error> {
    match n {
        -1 => Ok(crate::config::DISCARD_DIVERSION),
        0..=9 => Ok(n as usize),
        _ => Err(M4Error::BadDiversion(n.to_string())),
    }
}

fn undivert(m4: &mut M4, frame: &Frame, had_args: bool) -> Result<(), M4Error> {
    if !had_args {
        if m4.active_div != 0 {
            return Ok(());
        }
        for n in 1..crate::config::DISCARD_DIVERSION {
            let mut taken = std::mem::take(&mut m4.diversions[n]);
            m4.diversions[0].dump_into(&mut taken);
        }
        return Ok(());
    }
    for raw in &frame.args {
        let s = String::from_utf8_lossy(raw);
        let n: i64 = parse_int(&s, "undivert")?;
        if !(1..=9).contains(&n) {
            return Err(M4Error::BadDiversion(s.into_owned()));
        }
        let n = n as usize;
        let active = m4.active_div;
        let mut taken = std::mem::take(&mut m4.diversions[n]);
        m4.diversions[active].dump_into(&mut taken);
    }
    Ok(())
}

fn dumpdef(m4: &M4, frame: &Frame, had_args: bool) {
    if had_args && !frame.args.is_empty() {
        for raw in &frame.args {
            let name = String::from_utf8_lossy(raw);
            match m4.ht.get_def(&name) {
                Some(Some(def)) => crate::displaylevel!(2, "{name}: {def}\n"),
                Some(None) => crate::displaylevel!(2, "{name}: <builtin>\n"),
                None => crate::displaylevel!(2, "{name}: undefined\n"),
            }
        }
    } else {
        for (name, def) in m4.ht.entries() {
            match def {
                Some(def) => crate::displaylevel!(2, "{name}: {def}\n"),
                None => crate::displaylevel!(2, "{name}: <builtin>\n"),
            }
        }
    }
}

fn ifelse(args: &[Vec<u8>]) -> Vec<u8> {
    if args.len() < 2 {
        return Vec::new();
    }
    if args[0] == args[1] {
        return args.get(2).cloned().unwrap_or_default();
    }
    match args.len() {
        2 | 3 => Vec::new(),
        4 => args[3].clone(),
        _ => ifelse(&args[3..]),
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn substr(frame: &Frame) -> Result<Vec<u8>, M4Error> {
    let s = frame.arg(1);
    let start = parse_int(&frame.arg_str(2), "substr")?;
    if start < 0 || start as usize > s.len() {
        return Ok(Vec::new());
    }
    let start = start as usize;
    let len = if frame.args.len() >= 3 {
        let l = parse_int(&frame.arg_str(3), "substr")?;
        if l < 0 {
            0
        } else {
            (l as usize).min(s.len() - start)
        }
    } else {
        s.len() - start
    };
    Ok(s[start..start + len].to_vec())
}

fn translit(s: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let mut map: [Option<u8>; 256] = [None; 256];
    for i in 0..256 {
        map[i] = Some(i as u8);
    }
    for (i, &b) in from.iter().enumerate() {
        map[b as usize] = to.get(i).copied();
    }
    s.iter().filter_map(|&b| map[b as usize]).collect()
}

fn esyscmd(frame: &Frame, input: &mut Buf) -> Result<(), M4Error> {
    let cmd = frame.arg_str(1).into_owned();
    let shell = if cfg!(windows) { "cmd" } else { "sh" };
    let flag = if cfg!(windows) { "/C" } else { "-c" };
    let output = std::process::Command::new(shell)
        .arg(flag)
        .arg(&cmd)
        .output()?;
    if !output.status.success() {
        return Err(M4Error::Fatal(format!("esyscmd: `{cmd}' exited with {}", output.status)));
    }
    input.unget_str(&output.stdout);
    Ok(())
}

fn maketemp(frame: &Frame, input: &mut Buf) -> Result<(), M4Error> {
    let template = frame.arg_str(1).into_owned();
    let prefix = template.trim_end_matches('X');
    let named = tempfile::Builder::new()
        .prefix(prefix)
        .tempfile()
        .map_err(M4Error::Io)?;
    let (_, path) = named.keep().map_err(|e| M4Error::Io(e.error))?;
    input.unget_str(path.to_string_lossy().as_bytes());
    Ok(())
}

fn parse_int(s: &str, who: &str) -> Result<i64, M4Error> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| M4Error::BadNumber(format!("{who}: `{s}' is not an integer")))
}

fn arith1(
    frame: &Frame,
    input: &mut Buf,
    name: &str,
    op: impl Fn(i64) -> Option<i64>,
) -> Result<(), M4Error> {
    let a = parse_int(&frame.arg_str(1), name)?;
    let r = op(a).ok_or_else(|| M4Error::Fatal(format!("{name}: arithmetic overflow")))?;
    input.unget_str(r.to_string().as_bytes());
    Ok(())
}

fn arith2(
    frame: &Frame,
    input: &mut Buf,
    name: &str,
    op: impl Fn(i64, i64) -> Option<i64>,
) -> Result<(), M4Error> {
    let a = parse_int(&frame.arg_str(1), name)?;
    let b = parse_int(&frame.arg_str(2), name)?;
    let r = op(a, b).ok_or_else(|| {
        if name == "div" || name == "mod" {
            M4Error::DivideByZero
        } else {
            M4Error::Fatal(format!("{name}: arithmetic overflow"))
        }
    })?;
    input.unget_str(r.to_string().as_bytes());
    Ok(())
}
