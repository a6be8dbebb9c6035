//! Language catalogue: which tags exist, which one runs, and the example
//! program each tag starts with.

/// The only language tag the sandbox executes.
pub const EXECUTABLE_LANGUAGE: &str = "lua";

/// Tag a fresh session starts with when nothing is stored.
pub const DEFAULT_LANGUAGE: &str = EXECUTABLE_LANGUAGE;

/// Selectable languages as `(tag, display name)`.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("lua", "Lua"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("python", "Python"),
    ("java", "Java"),
    ("cpp", "C++"),
    ("csharp", "C#"),
    ("ruby", "Ruby"),
    ("go", "Go"),
    ("php", "PHP"),
    ("rust", "Rust"),
    ("swift", "Swift"),
    ("kotlin", "Kotlin"),
];

pub fn is_executable(language: &str) -> bool {
    language.eq_ignore_ascii_case(EXECUTABLE_LANGUAGE)
}

/// Display name for a tag, falling back to the tag itself.
pub fn display_name(language: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(language))
        .map(|(_, name)| *name)
        .unwrap_or(language)
}

pub fn file_extension(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "lua" => "lua",
        "javascript" => "js",
        "typescript" => "ts",
        "python" => "py",
        "java" => "java",
        "c" => "c",
        "cpp" | "c++" => "cpp",
        "csharp" | "c#" => "cs",
        "ruby" => "rb",
        "go" => "go",
        "php" => "php",
        "rust" => "rs",
        "swift" => "swift",
        "kotlin" => "kt",
        "html" => "html",
        "css" => "css",
        "json" => "json",
        "markdown" => "md",
        _ => "txt",
    }
}

/// Reverse of [`file_extension`] for the languages that have a default program.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    let tag = match ext.to_lowercase().as_str() {
        "lua" => "lua",
        "js" | "mjs" => "javascript",
        "ts" => "typescript",
        "py" => "python",
        "java" => "java",
        "cpp" | "cc" | "cxx" => "cpp",
        "cs" => "csharp",
        "rb" => "ruby",
        "go" => "go",
        "php" => "php",
        "rs" => "rust",
        "swift" => "swift",
        "kt" => "kotlin",
        _ => return None,
    };
    Some(tag)
}

/// Example program shown for a new or empty document.
pub fn default_code(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "lua" => LUA_EXAMPLE,
        "javascript" => JAVASCRIPT_EXAMPLE,
        "typescript" => TYPESCRIPT_EXAMPLE,
        "python" => PYTHON_EXAMPLE,
        "java" => JAVA_EXAMPLE,
        "cpp" | "c++" => CPP_EXAMPLE,
        "csharp" | "c#" => CSHARP_EXAMPLE,
        "ruby" => RUBY_EXAMPLE,
        "go" => GO_EXAMPLE,
        "php" => PHP_EXAMPLE,
        "rust" => RUST_EXAMPLE,
        "swift" => SWIFT_EXAMPLE,
        "kotlin" => KOTLIN_EXAMPLE,
        _ => PLACEHOLDER,
    }
}

const LUA_EXAMPLE: &str = r#"-- Lua Code Example
console.log("Hello, World!")

-- Example function
local function fibonacci(n)
  if n <= 1 then return n end
  return fibonacci(n - 1) + fibonacci(n - 2)
end

-- Print first 10 fibonacci numbers
for i = 0, 9 do
  console.log(string.format("Fibonacci(%d): %d", i, fibonacci(i)))
end
"#;

const JAVASCRIPT_EXAMPLE: &str = r#"// JavaScript Code Example
console.log("Hello, World!");

// Example function
function fibonacci(n) {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

// Print first 10 fibonacci numbers
for (let i = 0; i < 10; i++) {
  console.log(`Fibonacci(${i}): ${fibonacci(i)}`);
}
"#;

const TYPESCRIPT_EXAMPLE: &str = r#"// TypeScript Code Example
console.log("Hello, TypeScript!");

// Example function with types
function fibonacci(n: number): number {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

// Print first 10 fibonacci numbers
for (let i = 0; i < 10; i++) {
  console.log(`Fibonacci(${i}): ${fibonacci(i)}`);
}
"#;

const PYTHON_EXAMPLE: &str = r#"# Python Code Example
print("Hello, Python!")

# Example function
def fibonacci(n):
    if n <= 1:
        return n
    return fibonacci(n - 1) + fibonacci(n - 2)

# Print first 10 fibonacci numbers
for i in range(10):
    print(f"Fibonacci({i}): {fibonacci(i)}")
"#;

const JAVA_EXAMPLE: &str = r#"// Java Code Example
public class Main {
    public static void main(String[] args) {
        System.out.println("Hello, Java!");

        for (int i = 0; i < 10; i++) {
            System.out.println("Fibonacci(" + i + "): " + fibonacci(i));
        }
    }

    public static int fibonacci(int n) {
        if (n <= 1) return n;
        return fibonacci(n - 1) + fibonacci(n - 2);
    }
}
"#;

const CPP_EXAMPLE: &str = r#"// C++ Code Example
#include <iostream>

int fibonacci(int n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

int main() {
    std::cout << "Hello, C++!" << std::endl;

    for (int i = 0; i < 10; i++) {
        std::cout << "Fibonacci(" << i << "): " << fibonacci(i) << std::endl;
    }

    return 0;
}
"#;

const CSHARP_EXAMPLE: &str = r#"// C# Code Example
using System;

class Program {
    static void Main() {
        Console.WriteLine("Hello, C#!");

        for (int i = 0; i < 10; i++) {
            Console.WriteLine($"Fibonacci({i}): {Fibonacci(i)}");
        }
    }

    static int Fibonacci(int n) {
        if (n <= 1) return n;
        return Fibonacci(n - 1) + Fibonacci(n - 2);
    }
}
"#;

const RUBY_EXAMPLE: &str = r#"# Ruby Code Example
puts "Hello, Ruby!"

def fibonacci(n)
  return n if n <= 1
  fibonacci(n - 1) + fibonacci(n - 2)
end

10.times do |i|
  puts "Fibonacci(#{i}): #{fibonacci(i)}"
end
"#;

const GO_EXAMPLE: &str = r#"// Go Code Example
package main

import "fmt"

func fibonacci(n int) int {
	if n <= 1 {
		return n
	}
	return fibonacci(n-1) + fibonacci(n-2)
}

func main() {
	fmt.Println("Hello, Go!")

	for i := 0; i < 10; i++ {
		fmt.Printf("Fibonacci(%d): %d\n", i, fibonacci(i))
	}
}
"#;

const PHP_EXAMPLE: &str = r#"<?php
// PHP Code Example
echo "Hello, PHP!\n";

function fibonacci($n) {
    if ($n <= 1) return $n;
    return fibonacci($n - 1) + fibonacci($n - 2);
}

for ($i = 0; $i < 10; $i++) {
    echo "Fibonacci($i): " . fibonacci($i) . "\n";
}
?>
"#;

const RUST_EXAMPLE: &str = r#"// Rust Code Example
fn fibonacci(n: u32) -> u32 {
    if n <= 1 {
        return n;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

fn main() {
    println!("Hello, Rust!");

    for i in 0..10 {
        println!("Fibonacci({}): {}", i, fibonacci(i));
    }
}
"#;

const SWIFT_EXAMPLE: &str = r#"// Swift Code Example
print("Hello, Swift!")

func fibonacci(_ n: Int) -> Int {
    if n <= 1 { return n }
    return fibonacci(n - 1) + fibonacci(n - 2)
}

for i in 0..<10 {
    print("Fibonacci(\(i)): \(fibonacci(i))")
}
"#;

const KOTLIN_EXAMPLE: &str = r#"// Kotlin Code Example
fun main() {
    println("Hello, Kotlin!")

    for (i in 0 until 10) {
        println("Fibonacci($i): ${fibonacci(i)}")
    }
}

fun fibonacci(n: Int): Int {
    if (n <= 1) return n
    return fibonacci(n - 1) + fibonacci(n - 2)
}
"#;

const PLACEHOLDER: &str = "// Code Example\n// Start coding here...\n";
