use std::{
    env,
    fs::{self, create_dir, read_to_string},
    path::PathBuf,
    time::Instant,
};

use karakuri::{display_error, generate, parse_program, type_checker::type_checker::check, Backend};

fn main() {
    if !PathBuf::from("build").exists() {
        create_dir("build").unwrap();
    } else {
        for entry in fs::read_dir("build").unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            fs::remove_file(path).unwrap();
        }
    }

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        panic!("Incorrect arguments provided!");
    }

    let file_path: &str = &args[1];
    let backend = match args.get(2).map(|arg| arg.as_str()) {
        None | Some("js") => Backend::Js,
        Some("c") => Backend::C99,
        Some(other) => panic!("Unknown backend {:?}, expected \"js\" or \"c\"", other),
    };

    let start = Instant::now();

    let dump = read_to_string(file_path).expect("Failed to read file!");
    let tree = match parse_program(&dump) {
        Ok(tree) => tree,
        Err(error) => {
            display_error(&error);
            panic!()
        }
    };

    println!("Loaded syntax tree in {:?}", start.elapsed());

    let check_start = Instant::now();
    let typed = match check(&tree) {
        Ok(typed) => typed,
        Err(error) => {
            display_error(&error);
            panic!()
        }
    };

    println!("Type checked in {:?}", check_start.elapsed());

    let generate_start = Instant::now();
    let generated = match generate(&typed, backend) {
        Ok(generated) => generated,
        Err(error) => {
            display_error(&error);
            panic!()
        }
    };

    println!("Generated in {:?}", generate_start.elapsed());

    let out_path = match backend {
        Backend::Js => "build/out.js",
        Backend::C99 => "build/out.c",
    };
    fs::write(out_path, &generated).unwrap();

    println!("Wrote {}", out_path);
    println!("Total time: {:?}", start.elapsed());
}
